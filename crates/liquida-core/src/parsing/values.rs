use crate::extraction::CellValue;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Largest magnitude accepted as a currency amount (10^15). Anything above
/// is treated as unparseable.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Parse a spreadsheet cell into a monetary amount.
///
/// Handles formats like:
/// - `1250000` (numeric cell) -> 1250000
/// - `"$ 1,250,000"` -> 1250000
/// - `"1250000.50"` -> 1250000.50
/// - `""`, `"N/A"`, `"abc"` -> None
/// - `"5e28"` -> None (above [`MAX_AMOUNT`])
///
/// This is the single definition of "is this a number" used by the row
/// parsers. Invalid input is `None`, never an error.
pub fn parse_amount(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(f) => f64_to_decimal(*f).filter(within_bound),
        CellValue::Text(s) => parse_amount_str(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Like [`parse_amount`], but only strictly positive values count.
pub fn parse_positive_amount(cell: &CellValue) -> Option<Decimal> {
    parse_amount(cell).filter(|d| d.is_sign_positive() && !d.is_zero())
}

/// Parse a compliance percentage. `"95%"`, `"95"` and `95` all give 95.
pub fn parse_percentage(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Text(s) => parse_amount_str(&s.replace('%', "")),
        other => parse_amount(other),
    }
}

/// Parse a whole, non-negative day count.
pub fn parse_day_count(cell: &CellValue) -> Option<u32> {
    let d = parse_amount(cell)?;
    if d.is_sign_negative() || !d.fract().is_zero() {
        return None;
    }
    d.to_u32()
}

pub fn parse_amount_str(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
        .filter(within_bound)
}

fn within_bound(d: &Decimal) -> bool {
    d.abs() <= MAX_AMOUNT
}

/// Round to whole currency units, half away from zero.
pub fn round_currency(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert f64 to Decimal through its shortest string form, so that
/// `0.15_f64` becomes exactly `0.15`.
fn f64_to_decimal(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    format!("{f}")
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_numeric_cell() {
        assert_eq!(parse_amount(&CellValue::Number(1250000.0)), Some(dec!(1250000)));
        assert_eq!(parse_amount(&CellValue::Number(0.15)), Some(dec!(0.15)));
    }

    #[test]
    fn test_currency_symbol_and_thousands() {
        assert_eq!(parse_amount(&text("$ 1,250,000")), Some(dec!(1250000)));
        assert_eq!(parse_amount(&text("$1,250,000.50")), Some(dec!(1250000.50)));
        assert_eq!(parse_amount(&text("  980000 ")), Some(dec!(980000)));
    }

    #[test]
    fn test_invalid_is_none() {
        assert_eq!(parse_amount(&text("")), None);
        assert_eq!(parse_amount(&text("N/A")), None);
        assert_eq!(parse_amount(&text("abc")), None);
        assert_eq!(parse_amount(&CellValue::Empty), None);
        assert_eq!(parse_amount(&CellValue::Number(f64::NAN)), None);
    }

    #[test]
    fn test_oversized_amount_is_none() {
        assert_eq!(MAX_AMOUNT, dec!(1_000_000_000_000_000));
        assert_eq!(parse_amount(&text("5e28")), None);
        assert_eq!(parse_amount(&text("1E28")), None);
        assert_eq!(parse_amount(&text("-2e15")), None);
        assert_eq!(parse_amount(&CellValue::Number(1e20)), None);
        assert_eq!(parse_amount(&text("1.5e6")), Some(dec!(1500000)));
        assert_eq!(parse_amount(&text("1000000000000000")), Some(MAX_AMOUNT));
    }

    #[test]
    fn test_positive_only() {
        assert_eq!(parse_positive_amount(&text("0")), None);
        assert_eq!(parse_positive_amount(&text("-5000")), None);
        assert_eq!(parse_positive_amount(&text("5000")), Some(dec!(5000)));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(parse_percentage(&text("95.5%")), Some(dec!(95.5)));
        assert_eq!(parse_percentage(&CellValue::Number(87.0)), Some(dec!(87)));
    }

    #[test]
    fn test_day_count() {
        assert_eq!(parse_day_count(&CellValue::Number(22.0)), Some(22));
        assert_eq!(parse_day_count(&text("15")), Some(15));
        assert_eq!(parse_day_count(&text("15.5")), None);
        assert_eq!(parse_day_count(&text("-3")), None);
        assert_eq!(parse_day_count(&CellValue::Empty), None);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(dec!(173999.5)), dec!(174000));
        assert_eq!(round_currency(dec!(173999.49)), dec!(173999));
    }
}
