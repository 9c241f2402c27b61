use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activity::ActivityKind;
use crate::parsing::normalize::normalize_name;

/// One of the six macro-zones, plus the "no zone" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Noroccidente,
    SuroccidenteEjeCafetero,
    Cundinamarca,
    Costa,
    Santanderes,
    Remotas,
    SinZona,
}

impl Zone {
    /// The six zones a keyword table must cover, in display order.
    pub const MACRO: [Zone; 6] = [
        Zone::Noroccidente,
        Zone::SuroccidenteEjeCafetero,
        Zone::Cundinamarca,
        Zone::Costa,
        Zone::Santanderes,
        Zone::Remotas,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Zone::Noroccidente => "NOROCCIDENTE",
            Zone::SuroccidenteEjeCafetero => "SUROCCIDENTE_EJE_CAFETERO",
            Zone::Cundinamarca => "CUNDINAMARCA",
            Zone::Costa => "COSTA",
            Zone::Santanderes => "SANTANDERES",
            Zone::Remotas => "REMOTAS",
            Zone::SinZona => "SIN_ZONA",
        }
    }

    /// Accepts the code form (`SUROCCIDENTE_EJE_CAFETERO`) as well as the
    /// display form (`Suroccidente y Eje Cafetero`).
    pub fn from_str_loose(s: &str) -> Option<Zone> {
        let key: String = crate::parsing::normalize::fold_diacritics(s)
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty() && *w != "Y")
            .collect::<Vec<_>>()
            .join("_");
        match key.as_str() {
            "NOROCCIDENTE" => Some(Zone::Noroccidente),
            "SUROCCIDENTE_EJE_CAFETERO" => Some(Zone::SuroccidenteEjeCafetero),
            "CUNDINAMARCA" => Some(Zone::Cundinamarca),
            "COSTA" => Some(Zone::Costa),
            "SANTANDERES" => Some(Zone::Santanderes),
            "REMOTAS" => Some(Zone::Remotas),
            "SIN_ZONA" => Some(Zone::SinZona),
            _ => None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Noroccidente => write!(f, "Noroccidente"),
            Zone::SuroccidenteEjeCafetero => write!(f, "Suroccidente y Eje Cafetero"),
            Zone::Cundinamarca => write!(f, "Cundinamarca"),
            Zone::Costa => write!(f, "Costa"),
            Zone::Santanderes => write!(f, "Santanderes"),
            Zone::Remotas => write!(f, "Remotas"),
            Zone::SinZona => write!(f, "Sin zona"),
        }
    }
}

/// Zone filter used by rankings: either every technician or only those
/// with at least one task in the given zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZoneFilter {
    #[default]
    All,
    Zone(Zone),
}

impl ZoneFilter {
    pub fn from_str_loose(s: &str) -> Option<ZoneFilter> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(ZoneFilter::All);
        }
        Zone::from_str_loose(s).map(ZoneFilter::Zone)
    }
}

impl Serialize for ZoneFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ZoneFilter::All => serializer.serialize_str("all"),
            ZoneFilter::Zone(z) => serializer.serialize_str(z.code()),
        }
    }
}

impl fmt::Display for ZoneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneFilter::All => write!(f, "all"),
            ZoneFilter::Zone(z) => write!(f, "{z}"),
        }
    }
}

/// Label for a calendar month, e.g. `2026-02`.
///
/// Labels that name a month (`2026-02`, `February 2026`) are stored as
/// `YYYY-MM`, so every source spelling of one month is the same period.
/// Anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Period(String);

impl Period {
    pub fn new(label: impl Into<String>) -> Self {
        let raw = Period(label.into().trim().to_string());
        match raw.implied_date() {
            Some(date) => Period(date.format("%Y-%m").to_string()),
            None => raw,
        }
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// The first day of the month this label denotes.
    ///
    /// `2026-02` is read by appending `-01`; labels such as
    /// `February 2026` are accepted as well.
    pub fn implied_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.0), "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("01 {}", self.0), "%d %B %Y"))
            .ok()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Period {
    fn from(s: &str) -> Self {
        Period::new(s)
    }
}

impl From<String> for Period {
    fn from(s: String) -> Self {
        Period::new(s)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub code: String,
    pub activity_type: String,
    pub kind: ActivityKind,
    /// Point-of-service name.
    pub location: String,
    pub warehouse: String,
    pub department: String,
    pub city: String,
    pub zone: Zone,
    /// Free-text classification tag (tipificación).
    pub tag: String,
    /// Close/resolution date as it appeared in the source.
    pub closed_at: String,
    /// Value before the tipología discount.
    #[serde(default)]
    pub gross_value: Decimal,
    /// Fraction of `gross_value` withheld.
    #[serde(default)]
    pub discount_rate: Decimal,
    #[serde(default)]
    pub discount_value: Decimal,
    pub net_value: Decimal,
}

impl Task {
    /// Parse `closed_at` into a date.
    pub fn close_date(&self) -> Option<NaiveDate> {
        parse_close_date(&self.closed_at)
    }
}

/// Spreadsheet serial day numbers count from this date.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

pub(crate) fn parse_close_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    let serial: f64 = s.parse().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// A technician's figures for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub period: Period,
    pub net_total: Decimal,
    pub task_count: u32,
    pub tasks: Vec<Task>,
    /// Days worked, when the source reports attendance. `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worked_days: Option<u32>,
}

impl MonthRecord {
    pub fn empty(period: Period) -> Self {
        MonthRecord {
            period,
            net_total: Decimal::ZERO,
            task_count: 0,
            tasks: Vec::new(),
            worked_days: None,
        }
    }

    pub fn has_zone(&self, zone: Zone) -> bool {
        self.tasks.iter().any(|t| t.zone == zone)
    }

    /// Tasks ordered most-recent-first. Undated tasks go last in source order.
    pub fn tasks_by_date(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        tasks.sort_by(|a, b| b.close_date().cmp(&a.close_date()));
        tasks
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    /// Display name as first seen.
    pub name: String,
    pub normalized_key: String,
    pub months: Vec<MonthRecord>,
}

impl Technician {
    pub fn new(name: &str) -> Self {
        Technician {
            name: name.trim().to_string(),
            normalized_key: normalize_name(name),
            months: Vec::new(),
        }
    }

    pub fn month(&self, period: &Period) -> Option<&MonthRecord> {
        self.months.iter().find(|m| &m.period == period)
    }

    pub(crate) fn month_mut(&mut self, period: &Period) -> Option<&mut MonthRecord> {
        self.months.iter_mut().find(|m| &m.period == period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_iso_label() {
        let p = Period::new("2026-02");
        assert_eq!(p.implied_date(), NaiveDate::from_ymd_opt(2026, 2, 1));
    }

    #[test]
    fn test_period_month_name_label() {
        let p = Period::new("February 2026");
        assert_eq!(p.implied_date(), NaiveDate::from_ymd_opt(2026, 2, 1));
    }

    #[test]
    fn test_period_unparseable() {
        let p = Period::new(" Q1 ");
        assert!(p.implied_date().is_none());
        assert_eq!(p.label(), "Q1");
    }

    #[test]
    fn test_period_spellings_of_one_month_are_equal() {
        assert_eq!(Period::new("February 2026"), Period::new("2026-02"));
        assert_eq!(Period::new("February 2026").label(), "2026-02");
        assert_eq!(Period::new(" 2026-02 ").label(), "2026-02");
    }

    #[test]
    fn test_period_deserializes_through_new() {
        let p: Period = serde_json::from_str(r#""January 2026""#).unwrap();
        assert_eq!(p.label(), "2026-01");
        assert_eq!(serde_json::to_string(&p).unwrap(), r#""2026-01""#);
    }

    #[test]
    fn test_zone_from_str_loose() {
        assert_eq!(
            Zone::from_str_loose("Suroccidente y Eje Cafetero"),
            Some(Zone::SuroccidenteEjeCafetero)
        );
        assert_eq!(
            Zone::from_str_loose("SUROCCIDENTE_EJE_CAFETERO"),
            Some(Zone::SuroccidenteEjeCafetero)
        );
        assert_eq!(Zone::from_str_loose("remotas"), Some(Zone::Remotas));
        assert_eq!(Zone::from_str_loose("sin zona"), Some(Zone::SinZona));
        assert_eq!(Zone::from_str_loose("llanos"), None);
    }

    #[test]
    fn test_zone_filter_all() {
        assert_eq!(ZoneFilter::from_str_loose("all"), Some(ZoneFilter::All));
        assert_eq!(
            ZoneFilter::from_str_loose("costa"),
            Some(ZoneFilter::Zone(Zone::Costa))
        );
    }

    #[test]
    fn test_close_date_formats() {
        assert_eq!(
            parse_close_date("2026-02-14 09:30:00"),
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
        assert_eq!(
            parse_close_date("14/02/2026"),
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
        // 46067 is 2026-02-14 in spreadsheet serial days
        assert_eq!(parse_close_date("46067"), NaiveDate::from_ymd_opt(2026, 2, 14));
        assert!(parse_close_date("pendiente").is_none());
        assert!(parse_close_date("").is_none());
    }

    #[test]
    fn test_technician_new_derives_key() {
        let t = Technician::new("  Juan  Pérez ");
        assert_eq!(t.name, "Juan  Pérez");
        assert_eq!(t.normalized_key, "JUAN PÉREZ");
    }
}
