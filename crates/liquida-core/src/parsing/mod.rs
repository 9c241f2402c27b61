pub mod header;
pub mod normalize;
pub mod values;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extraction::SheetRow;
use crate::model::Zone;
use crate::settings::schema::DiscountTable;
use crate::zones::ZoneClassifier;
use header::*;

/// One row of the activities sheet, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Technician display name as written in the row.
    pub technician: String,
    pub task_code: String,
    pub activity_type: String,
    pub location: String,
    pub warehouse: String,
    pub department: String,
    pub city: String,
    pub venue_city: String,
    pub tag: String,
    pub closed_at: String,
    /// Value before the tipología discount. Equals `net_value` when the
    /// row carried a net column.
    pub gross_value: Decimal,
    pub discount_rate: Decimal,
    pub discount_value: Decimal,
    /// Zero when neither a net nor a gross column held a positive number.
    pub net_value: Decimal,
    pub zone: Zone,
}

/// One row of the production sheet, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub technician: String,
    /// Zero when no total column held a positive number.
    pub production_total: Decimal,
    pub goal: Option<Decimal>,
    pub compliance_pct: Option<Decimal>,
    pub worked_days: Option<u32>,
}

/// A row that was dropped during parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Zero-based index among the data rows.
    pub row_index: usize,
    pub reason: String,
}

/// Records from one sheet together with the rows that did not make it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedRows<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> ParsedRows<T> {
    pub fn dropped(&self) -> usize {
        self.skipped.len()
    }
}

/// Gross, discount and net for one activity row.
#[derive(Debug, Clone, Copy, Default)]
struct Valuation {
    gross: Decimal,
    rate: Decimal,
    discount: Decimal,
    net: Decimal,
}

/// A net column is taken as-is. Otherwise the gross column is discounted
/// at the rate `discounts` gives for the row's tag.
fn valuation(row: &SheetRow, tag: &str, discounts: &DiscountTable) -> Valuation {
    if let Some(net) = resolve_positive_amount(row, &ACTIVITY_NET_VALUE) {
        return Valuation {
            gross: net,
            net,
            ..Valuation::default()
        };
    }
    let Some(gross) = resolve_positive_amount(row, &ACTIVITY_GROSS_VALUE) else {
        return Valuation::default();
    };
    let rate = discounts.rate_for(tag);
    let discount = gross * rate;
    Valuation {
        gross,
        rate,
        discount,
        net: gross - discount,
    }
}

/// Parse activities-sheet rows.
///
/// Rows with no resolvable technician name are dropped and reported in
/// `skipped`. Unparseable values never fail the batch.
pub fn parse_activity_rows(
    rows: &[SheetRow],
    zones: &ZoneClassifier,
    discounts: &DiscountTable,
) -> ParsedRows<ActivityRecord> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let Some(technician) = resolve_text(row, &ACTIVITY_TECHNICIAN) else {
            skipped.push(SkippedRow {
                row_index,
                reason: "no technician name".into(),
            });
            continue;
        };

        let warehouse = text_or_empty(row, &ACTIVITY_WAREHOUSE);
        let department = text_or_empty(row, &ACTIVITY_DEPARTMENT);
        let city = text_or_empty(row, &ACTIVITY_CITY);
        let venue_city = text_or_empty(row, &ACTIVITY_VENUE_CITY);
        let zone = zones.classify(&warehouse, &department, &city, &venue_city);
        let tag = text_or_empty(row, &ACTIVITY_TAG);
        let value = valuation(row, &tag, discounts);

        records.push(ActivityRecord {
            technician,
            task_code: text_or_empty(row, &ACTIVITY_TASK_CODE),
            activity_type: text_or_empty(row, &ACTIVITY_TYPE),
            location: text_or_empty(row, &ACTIVITY_LOCATION),
            warehouse,
            department,
            city,
            venue_city,
            tag,
            closed_at: text_or_empty(row, &ACTIVITY_CLOSE_DATE),
            gross_value: value.gross,
            discount_rate: value.rate,
            discount_value: value.discount,
            net_value: value.net,
            zone,
        });
    }

    if !skipped.is_empty() {
        warn!(
            target: "liquida::parsing",
            dropped = skipped.len(),
            kept = records.len(),
            "activity rows without technician name dropped"
        );
    }

    ParsedRows { records, skipped }
}

/// Parse production-sheet rows.
///
/// Rows with an empty name are dropped. Numeric fields that fail to parse
/// become zero (total) or `None` (goal, compliance, worked days).
pub fn parse_production_rows(rows: &[SheetRow]) -> ParsedRows<ProductionRecord> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let Some(technician) = resolve_text(row, &PRODUCTION_TECHNICIAN) else {
            skipped.push(SkippedRow {
                row_index,
                reason: "no technician name".into(),
            });
            continue;
        };

        records.push(ProductionRecord {
            technician,
            production_total: resolve_positive_amount(row, &PRODUCTION_TOTAL)
                .unwrap_or(Decimal::ZERO),
            goal: resolve_positive_amount(row, &PRODUCTION_GOAL),
            compliance_pct: resolve_percentage(row, &PRODUCTION_COMPLIANCE),
            worked_days: resolve_day_count(row, &PRODUCTION_WORKED_DAYS),
        });
    }

    if !skipped.is_empty() {
        warn!(
            target: "liquida::parsing",
            dropped = skipped.len(),
            kept = records.len(),
            "production rows without technician name dropped"
        );
    }

    ParsedRows { records, skipped }
}
