pub mod xlsx;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single spreadsheet cell, as handed over by whatever read the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Cell content as trimmed text, `None` when blank.
    ///
    /// Whole numbers render without a fractional part, so a numeric task
    /// code `1045.0` reads back as `"1045"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", *f as i64))
                } else {
                    Some(f.to_string())
                }
            }
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Number(f)
    }
}

/// One data row of a sheet, keyed by the header text of its column.
///
/// Header text is kept verbatim (including stray trailing spaces), since
/// the alias tables in [`crate::parsing::header`] list those variants
/// explicitly.
pub type SheetRow = BTreeMap<String, CellValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Number(1045.0).as_text().as_deref(), Some("1045"));
        assert_eq!(CellValue::Number(10.5).as_text().as_deref(), Some("10.5"));
        assert_eq!(CellValue::Text("  ".into()).as_text(), None);
        assert_eq!(CellValue::Text(" Cali ".into()).as_text().as_deref(), Some("Cali"));
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_deserialize_untagged() {
        let row: SheetRow =
            serde_json::from_str(r#"{"TECNICO": "Ana", "VALOR": 1200.5, "X": null}"#).unwrap();
        assert_eq!(row["TECNICO"], CellValue::Text("Ana".into()));
        assert_eq!(row["VALOR"], CellValue::Number(1200.5));
        assert_eq!(row["X"], CellValue::Empty);
    }
}
