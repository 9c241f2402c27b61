use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::activity::ActivityKind;
use crate::commission::{
    compute_commission, effective_goal, percentage_of_goal, CommissionOutcome, GoalStatus,
};
use crate::error::LiquidaError;
use crate::model::{Period, Task, Technician};
use crate::parsing::normalize::normalize_name;
use crate::roster::Roster;
use crate::settings::schema::CommissionPlan;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindBreakdown {
    pub kind: ActivityKind,
    pub count: u32,
    pub net: Decimal,
}

/// Tasks sharing one classification tag (tipología).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSummary {
    pub tag: String,
    pub count: u32,
    pub gross: Decimal,
    pub net: Decimal,
    /// Rate of the first task seen with this tag.
    pub discount_rate: Decimal,
}

/// Everything needed to render one technician's monthly statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicianMonthReport {
    pub name: String,
    pub period: Period,
    pub net_total: Decimal,
    pub task_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worked_days: Option<u32>,
    pub base_goal: Decimal,
    /// Goal after proration by worked days.
    pub effective_goal: Decimal,
    /// Percentage of the base goal.
    pub percentage: Decimal,
    pub status: GoalStatus,
    /// Computed against the effective goal.
    pub commission: CommissionOutcome,
    pub breakdown: Vec<KindBreakdown>,
    /// Sums over the listed tasks, before and after the tipología discount.
    pub gross_total: Decimal,
    pub discount_total: Decimal,
    /// Ordered by tag. Untagged tasks are left out.
    pub tag_summary: Vec<TagSummary>,
    /// Most recent first.
    pub tasks: Vec<Task>,
}

fn summarize_tags(tasks: &[Task]) -> Vec<TagSummary> {
    let mut tags: BTreeMap<String, TagSummary> = BTreeMap::new();
    for task in tasks {
        let tag = normalize_name(&task.tag);
        if tag.is_empty() {
            continue;
        }
        let slot = tags.entry(tag.clone()).or_insert_with(|| TagSummary {
            tag,
            count: 0,
            gross: Decimal::ZERO,
            net: Decimal::ZERO,
            discount_rate: task.discount_rate,
        });
        slot.count += 1;
        slot.gross += task.gross_value;
        slot.net += task.net_value;
    }
    tags.into_values().collect()
}

pub fn month_report(
    technician: &Technician,
    period: &Period,
    plan: &CommissionPlan,
) -> Result<TechnicianMonthReport, LiquidaError> {
    let month = technician
        .month(period)
        .ok_or_else(|| LiquidaError::PeriodNotFound {
            technician: technician.name.clone(),
            period: period.to_string(),
        })?;

    let goal = effective_goal(plan.monthly_goal, month.worked_days);
    let percentage = percentage_of_goal(month.net_total, plan.monthly_goal);

    let mut kinds: BTreeMap<ActivityKind, (u32, Decimal)> = BTreeMap::new();
    for task in &month.tasks {
        let slot = kinds.entry(task.kind).or_insert((0, Decimal::ZERO));
        slot.0 += 1;
        slot.1 += task.net_value;
    }

    Ok(TechnicianMonthReport {
        name: technician.name.clone(),
        period: period.clone(),
        net_total: month.net_total,
        task_count: month.task_count,
        worked_days: month.worked_days,
        base_goal: plan.monthly_goal,
        effective_goal: goal,
        percentage,
        status: GoalStatus::from_percentage(percentage),
        commission: compute_commission(month.net_total, goal, &plan.tiers),
        breakdown: kinds
            .into_iter()
            .map(|(kind, (count, net))| KindBreakdown { kind, count, net })
            .collect(),
        gross_total: month.tasks.iter().map(|t| t.gross_value).sum(),
        discount_total: month.tasks.iter().map(|t| t.discount_value).sum(),
        tag_summary: summarize_tags(&month.tasks),
        tasks: month.tasks_by_date().into_iter().cloned().collect(),
    })
}

/// Totals across the whole roster. `total_net` stops growing at
/// `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub technicians: usize,
    pub total_tasks: u64,
    pub total_net: Decimal,
    pub periods: Vec<Period>,
}

pub fn summarize(roster: &Roster) -> RosterSummary {
    let months = roster.iter().flat_map(|t| t.months.iter());
    let (total_tasks, total_net) = months.fold((0u64, Decimal::ZERO), |(n, net), m| {
        (
            n + u64::from(m.task_count),
            net.checked_add(m.net_total).unwrap_or(Decimal::MAX),
        )
    });
    RosterSummary {
        technicians: roster.len(),
        total_tasks,
        total_net,
        periods: roster.available_periods(),
    }
}
