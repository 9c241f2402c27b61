use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::activity::classify_activity_kind;
use crate::model::{MonthRecord, Period, Task};
use crate::parsing::normalize::normalize_name;
use crate::parsing::values::round_currency;
use crate::parsing::{ActivityRecord, ProductionRecord};

/// One technician's figures within a [`MonthAggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTechnician {
    pub key: String,
    /// Display name as first seen in this batch.
    pub name: String,
    pub record: MonthRecord,
}

/// Per-technician month records for a single period, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthAggregate {
    pub period: Period,
    entries: Vec<AggregatedTechnician>,
    index: HashMap<String, usize>,
}

impl MonthAggregate {
    pub fn new(period: Period) -> Self {
        MonthAggregate {
            period,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &[AggregatedTechnician] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&AggregatedTechnician> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a record, replacing any existing one for the same normalized
    /// name. A replaced entry keeps its position and first-seen display name.
    pub fn upsert(&mut self, name: &str, mut record: MonthRecord) {
        record.period = self.period.clone();
        let key = normalize_name(name);
        match self.index.get(&key) {
            Some(&i) => self.entries[i].record = record,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(AggregatedTechnician {
                    key,
                    name: name.trim().to_string(),
                    record,
                });
            }
        }
    }

    fn entry_mut(&mut self, name: &str) -> &mut AggregatedTechnician {
        let key = normalize_name(name);
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push(AggregatedTechnician {
                    key,
                    name: name.trim().to_string(),
                    record: MonthRecord::empty(self.period.clone()),
                });
                i
            }
        };
        &mut self.entries[i]
    }

    pub fn into_entries(self) -> Vec<AggregatedTechnician> {
        self.entries
    }
}

impl From<&ActivityRecord> for Task {
    fn from(a: &ActivityRecord) -> Self {
        Task {
            code: a.task_code.clone(),
            activity_type: a.activity_type.clone(),
            kind: classify_activity_kind(&a.activity_type),
            location: a.location.clone(),
            warehouse: a.warehouse.clone(),
            department: a.department.clone(),
            city: a.city.clone(),
            zone: a.zone,
            tag: a.tag.clone(),
            closed_at: a.closed_at.clone(),
            gross_value: a.gross_value,
            discount_rate: a.discount_rate,
            discount_value: a.discount_value,
            net_value: a.net_value,
        }
    }
}

/// Combine one period's activity and production rows into one record per
/// technician.
///
/// Production totals are authoritative. Activity values fund a technician's
/// net total only when production gave no figure (zero or absent) for them.
/// Every activity adds a task and bumps the task count either way.
pub fn aggregate(
    activities: &[ActivityRecord],
    production: &[ProductionRecord],
    period: &Period,
) -> MonthAggregate {
    let mut agg = MonthAggregate::new(period.clone());

    for p in production {
        let mut record = MonthRecord::empty(period.clone());
        record.net_total = p.production_total;
        record.worked_days = p.worked_days;
        agg.upsert(&p.technician, record);
    }

    let funded_by_production: HashSet<String> = agg
        .entries
        .iter()
        .filter(|e| !e.record.net_total.is_zero())
        .map(|e| e.key.clone())
        .collect();

    for a in activities {
        let entry = agg.entry_mut(&a.technician);
        let accumulate = !funded_by_production.contains(&entry.key);
        let record = &mut entry.record;
        record.tasks.push(Task::from(a));
        record.task_count += 1;
        if accumulate {
            match record.net_total.checked_add(a.net_value) {
                Some(total) => record.net_total = total,
                None => warn!(
                    target: "liquida::aggregate",
                    technician = %entry.name,
                    value = %a.net_value,
                    "activity value would overflow the month total, not added"
                ),
            }
        }
    }

    for e in &mut agg.entries {
        e.record.net_total = round_currency(e.record.net_total);
    }

    debug!(
        target: "liquida::aggregate",
        period = %period,
        technicians = agg.len(),
        activities = activities.len(),
        production = production.len(),
        "month aggregated"
    );

    agg
}
