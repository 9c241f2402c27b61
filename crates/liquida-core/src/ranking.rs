use rust_decimal::Decimal;
use serde::Serialize;

use crate::commission::percentage_of_goal;
use crate::model::{Period, ZoneFilter};
use crate::parsing::normalize::fold_diacritics;
use crate::roster::Roster;

/// Ranked technicians shown per period.
pub const RANKING_SIZE: usize = 10;
pub const PODIUM_SIZE: usize = 3;

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SEARCH_HITS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    /// 1-based rank.
    pub position: usize,
    pub name: String,
    pub net_total: Decimal,
    pub task_count: u32,
    /// Net total as a percentage of the base goal.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub period: Period,
    pub zone: ZoneFilter,
    /// Top three in display order: 2nd, 1st, 3rd.
    pub podium: Vec<RankingEntry>,
    /// Positions 4 to 10.
    pub rest: Vec<RankingEntry>,
}

impl Ranking {
    /// Every entry by position.
    pub fn ordered(&self) -> Vec<&RankingEntry> {
        let mut all: Vec<&RankingEntry> = self.podium.iter().chain(self.rest.iter()).collect();
        all.sort_by_key(|e| e.position);
        all
    }

    pub fn is_empty(&self) -> bool {
        self.podium.is_empty()
    }
}

/// Top technicians for `period`, optionally limited to those with work in
/// one zone. Ties keep roster order.
pub fn rank(roster: &Roster, period: &Period, zone: ZoneFilter, base_goal: Decimal) -> Ranking {
    let mut candidates: Vec<(&str, Decimal, u32)> = roster
        .iter()
        .filter_map(|t| t.month(period).map(|m| (t, m)))
        .filter(|(_, m)| match zone {
            ZoneFilter::All => true,
            ZoneFilter::Zone(z) => m.has_zone(z),
        })
        .filter(|(_, m)| m.net_total > Decimal::ZERO)
        .map(|(t, m)| (t.name.as_str(), m.net_total, m.task_count))
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let mut entries: Vec<RankingEntry> = candidates
        .into_iter()
        .take(RANKING_SIZE)
        .enumerate()
        .map(|(i, (name, net_total, task_count))| RankingEntry {
            position: i + 1,
            name: name.to_string(),
            net_total,
            task_count,
            percentage: percentage_of_goal(net_total, base_goal),
        })
        .collect();

    let rest = entries.split_off(entries.len().min(PODIUM_SIZE));
    Ranking {
        period: period.clone(),
        zone,
        podium: podium_display_order(entries),
        rest,
    }
}

fn podium_display_order(mut top: Vec<RankingEntry>) -> Vec<RankingEntry> {
    if top.len() >= 2 {
        top.swap(0, 1);
    }
    top
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: String,
    /// Net total in the searched period, zero if the technician has none.
    pub net_total: Decimal,
}

/// Name search. Accents and case are ignored.
pub fn search(roster: &Roster, query: &str, period: &Period) -> Vec<SearchHit> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let needle = fold_diacritics(query);

    let mut hits: Vec<SearchHit> = roster
        .iter()
        .filter(|t| fold_diacritics(&t.name).contains(&needle))
        .map(|t| SearchHit {
            name: t.name.clone(),
            net_total: t.month(period).map_or(Decimal::ZERO, |m| m.net_total),
        })
        .collect();
    hits.sort_by(|a, b| b.net_total.cmp(&a.net_total));
    hits.truncate(MAX_SEARCH_HITS);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::merge::merge_record;
    use crate::model::{MonthRecord, Task, Zone};
    use rust_decimal_macros::dec;

    fn p() -> Period {
        Period::new("2026-02")
    }

    fn record(net: Decimal, zone: Zone) -> MonthRecord {
        let mut r = MonthRecord::empty(p());
        r.net_total = net;
        r.task_count = 1;
        r.tasks.push(Task {
            code: "T".into(),
            activity_type: "Cierre".into(),
            kind: ActivityKind::Cierre,
            location: String::new(),
            warehouse: String::new(),
            department: String::new(),
            city: String::new(),
            zone,
            tag: String::new(),
            closed_at: String::new(),
            gross_value: net,
            discount_rate: Decimal::ZERO,
            discount_value: Decimal::ZERO,
            net_value: net,
        });
        r
    }

    fn roster_of(rows: &[(&str, Decimal, Zone)]) -> Roster {
        let mut roster = Roster::new();
        for (name, net, zone) in rows {
            merge_record(&mut roster, name, record(*net, *zone));
        }
        roster
    }

    #[test]
    fn test_twelve_technicians_split_three_seven() {
        let names: Vec<String> = (1..=12).map(|i| format!("Tecnico {i:02}")).collect();
        let mut rows: Vec<(&str, Decimal, Zone)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), Decimal::from(1_000_000 * (i as i64 + 1)), Zone::Costa))
            .collect();
        rows.push(("Cero", Decimal::ZERO, Zone::Costa));
        rows.push(("Negativo", dec!(-5000), Zone::Costa));
        let roster = roster_of(&rows);

        let ranking = rank(&roster, &p(), ZoneFilter::All, dec!(4500000));
        assert_eq!(ranking.podium.len(), 3);
        assert_eq!(ranking.rest.len(), 7);

        let ordered = ranking.ordered();
        assert_eq!(ordered.len(), 10);
        assert!(ordered.windows(2).all(|w| w[0].net_total > w[1].net_total));
        assert!(ordered.iter().all(|e| e.net_total > Decimal::ZERO));
        assert_eq!(ordered[0].name, "Tecnico 12");

        let podium: Vec<usize> = ranking.podium.iter().map(|e| e.position).collect();
        assert_eq!(podium, vec![2, 1, 3]);
        assert_eq!(ranking.rest[0].position, 4);
    }

    #[test]
    fn test_zone_filter() {
        let roster = roster_of(&[
            ("Ana", dec!(3000000), Zone::Costa),
            ("Luis", dec!(5000000), Zone::Noroccidente),
        ]);
        let ranking = rank(&roster, &p(), ZoneFilter::Zone(Zone::Costa), dec!(4500000));
        let ordered = ranking.ordered();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].name, "Ana");
        assert_eq!(ordered[0].percentage, dec!(66.7));
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let roster = roster_of(&[
            ("Primero", dec!(1000000), Zone::Costa),
            ("Segundo", dec!(1000000), Zone::Costa),
        ]);
        let ranking = rank(&roster, &p(), ZoneFilter::All, dec!(4500000));
        let ordered = ranking.ordered();
        assert_eq!(ordered[0].name, "Primero");
        assert_eq!(ordered[1].name, "Segundo");
    }

    #[test]
    fn test_missing_period_is_empty() {
        let roster = roster_of(&[("Ana", dec!(1000000), Zone::Costa)]);
        let ranking = rank(&roster, &Period::new("2025-01"), ZoneFilter::All, dec!(4500000));
        assert!(ranking.is_empty());
        assert!(ranking.rest.is_empty());
    }

    #[test]
    fn test_search_sorted_and_folded() {
        let roster = roster_of(&[
            ("José Pérez", dec!(1000000), Zone::Costa),
            ("Josefina Ruiz", dec!(2000000), Zone::Costa),
            ("Luis Rey", dec!(3000000), Zone::Costa),
        ]);
        let hits = search(&roster, "jose", &p());
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Josefina Ruiz", "José Pérez"]);
    }

    #[test]
    fn test_search_short_query() {
        let roster = roster_of(&[("Ana", dec!(1), Zone::Costa)]);
        assert!(search(&roster, " a ", &p()).is_empty());
    }

    #[test]
    fn test_search_caps_hits() {
        let names: Vec<String> = (0..12).map(|i| format!("Tecnico {i}")).collect();
        let rows: Vec<(&str, Decimal, Zone)> =
            names.iter().map(|n| (n.as_str(), dec!(1), Zone::Costa)).collect();
        let roster = roster_of(&rows);
        assert_eq!(search(&roster, "tec", &p()).len(), MAX_SEARCH_HITS);
    }
}
