use rust_decimal::Decimal;
use tracing::debug;

use crate::aggregate::MonthAggregate;
use crate::model::{MonthRecord, Technician};
use crate::parsing::normalize::normalize_name;
use crate::roster::Roster;

/// Net totals closer than this are considered the same figure.
pub const CHANGE_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// What happened to one incoming month record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New technician.
    Created,
    /// Known technician, new period.
    Appended,
    Replaced,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub created: usize,
    pub appended: usize,
    pub replaced: usize,
    pub unchanged: usize,
}

impl MergeSummary {
    pub fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Created => self.created += 1,
            MergeOutcome::Appended => self.appended += 1,
            MergeOutcome::Replaced => self.replaced += 1,
            MergeOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn absorb(&mut self, other: MergeSummary) {
        self.created += other.created;
        self.appended += other.appended;
        self.replaced += other.replaced;
        self.unchanged += other.unchanged;
    }

    /// Records that changed the roster.
    pub fn changed(&self) -> usize {
        self.created + self.appended + self.replaced
    }
}

/// Whether `incoming` should overwrite `existing` for the same period.
pub fn should_replace(existing: &MonthRecord, incoming: &MonthRecord) -> bool {
    existing.tasks.is_empty()
        || (existing.net_total - incoming.net_total).abs() >= CHANGE_THRESHOLD
        || existing.task_count != incoming.task_count
}

/// Merge one technician's month record into the roster.
pub fn merge_record(roster: &mut Roster, name: &str, record: MonthRecord) -> MergeOutcome {
    let key = normalize_name(name);
    let outcome = match roster.get_mut(&key) {
        None => {
            let mut technician = Technician::new(name);
            technician.months.push(record);
            roster.insert(technician);
            MergeOutcome::Created
        }
        Some(technician) => match technician.month_mut(&record.period) {
            None => {
                technician.months.push(record);
                MergeOutcome::Appended
            }
            Some(existing) if should_replace(existing, &record) => {
                *existing = record;
                MergeOutcome::Replaced
            }
            Some(_) => MergeOutcome::Unchanged,
        },
    };
    debug!(target: "liquida::merge", technician = %key, ?outcome, "month record merged");
    outcome
}

/// Merge a whole month aggregate into the roster, in aggregate order.
pub fn merge(roster: &mut Roster, aggregate: MonthAggregate) -> MergeSummary {
    let period = aggregate.period.clone();
    let mut summary = MergeSummary::default();
    for entry in aggregate.into_entries() {
        let mut record = entry.record;
        record.period = period.clone();
        summary.record(merge_record(roster, &entry.name, record));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::model::{Period, Task, Zone};
    use rust_decimal_macros::dec;

    fn task(n: u32) -> Task {
        Task {
            code: format!("T{n}"),
            activity_type: "Cierre".into(),
            kind: ActivityKind::Cierre,
            location: String::new(),
            warehouse: String::new(),
            department: "Antioquia".into(),
            city: String::new(),
            zone: Zone::Noroccidente,
            tag: String::new(),
            closed_at: String::new(),
            gross_value: dec!(10000),
            discount_rate: Decimal::ZERO,
            discount_value: Decimal::ZERO,
            net_value: dec!(10000),
        }
    }

    fn record(net: Decimal, tasks: u32, count: u32) -> MonthRecord {
        let mut r = MonthRecord::empty(Period::new("2026-02"));
        r.net_total = net;
        r.tasks = (0..tasks).map(task).collect();
        r.task_count = count;
        r
    }

    #[test]
    fn test_create_then_append() {
        let mut roster = Roster::new();
        assert_eq!(
            merge_record(&mut roster, "Ana Gómez", record(dec!(1000), 1, 1)),
            MergeOutcome::Created
        );
        let mut march = record(dec!(2000), 1, 1);
        march.period = Period::new("2026-03");
        assert_eq!(
            merge_record(&mut roster, "ANA GÓMEZ", march),
            MergeOutcome::Appended
        );
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.technicians()[0].months.len(), 2);
    }

    #[test]
    fn test_sparser_record_does_not_regress() {
        let mut roster = Roster::new();
        merge_record(&mut roster, "Ana", record(dec!(5000000), 40, 40));
        let outcome = merge_record(&mut roster, "Ana", record(dec!(5000050), 0, 40));
        assert_eq!(outcome, MergeOutcome::Unchanged);
        let m = roster.find("Ana").unwrap().month(&Period::new("2026-02")).unwrap();
        assert_eq!(m.tasks.len(), 40);
        assert_eq!(m.net_total, dec!(5000000));
    }

    #[test]
    fn test_net_change_at_threshold_replaces() {
        let mut roster = Roster::new();
        merge_record(&mut roster, "Ana", record(dec!(5000000), 40, 40));
        let outcome = merge_record(&mut roster, "Ana", record(dec!(5000100), 0, 40));
        assert_eq!(outcome, MergeOutcome::Replaced);
        let m = roster.find("Ana").unwrap().month(&Period::new("2026-02")).unwrap();
        assert_eq!(m.net_total, dec!(5000100));
    }

    #[test]
    fn test_task_count_change_replaces() {
        let mut roster = Roster::new();
        merge_record(&mut roster, "Ana", record(dec!(5000000), 40, 40));
        let outcome = merge_record(&mut roster, "Ana", record(dec!(5000000), 41, 41));
        assert_eq!(outcome, MergeOutcome::Replaced);
    }

    #[test]
    fn test_existing_without_tasks_is_replaced() {
        let mut roster = Roster::new();
        merge_record(&mut roster, "Ana", record(dec!(5000000), 0, 0));
        let outcome = merge_record(&mut roster, "Ana", record(dec!(5000000), 0, 0));
        assert_eq!(outcome, MergeOutcome::Replaced);
    }

    #[test]
    fn test_idempotent_remerge() {
        let mut agg = MonthAggregate::new(Period::new("2026-02"));
        agg.upsert("Ana Gómez", record(dec!(3000000), 3, 3));
        agg.upsert("Luis Rey", record(dec!(1500000), 2, 2));

        let mut once = Roster::new();
        merge(&mut once, agg.clone());
        let mut twice = once.clone();
        let summary = merge(&mut twice, agg);

        assert_eq!(once, twice);
        assert_eq!(summary.unchanged, 2);
        assert_eq!(summary.changed(), 0);
    }

    #[test]
    fn test_merge_sets_aggregate_period() {
        let mut agg = MonthAggregate::new(Period::new("2026-04"));
        agg.upsert("Ana", record(dec!(1), 1, 1));
        let mut roster = Roster::new();
        let summary = merge(&mut roster, agg);
        assert_eq!(summary.created, 1);
        assert!(roster.find("Ana").unwrap().month(&Period::new("2026-04")).is_some());
    }
}
