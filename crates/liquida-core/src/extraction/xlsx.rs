use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::LiquidaError;
use crate::extraction::{CellValue, SheetRow};
use crate::ingest::SheetBatch;
use crate::model::Period;
use crate::parsing::normalize::fold_diacritics;

/// Sheet names under which the per-task activity export has been published.
pub const ACTIVITY_SHEETS: &[&str] = &["ACTIVIDADES", "TAREAS", "DETALLE ACTIVIDADES", "DETALLE"];

/// Sheet names for the per-technician production summary.
pub const PRODUCTION_SHEETS: &[&str] = &["PRODUCCION", "RESUMEN PRODUCCION", "RESUMEN", "METAS"];

/// Read a monthly workbook into a [`SheetBatch`] for `period`.
///
/// The activities sheet is required. A workbook with no production sheet
/// yields an empty production list, and activity values become the
/// only funding source for that month.
pub fn read_workbook(bytes: &[u8], period: Period) -> Result<SheetBatch, LiquidaError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| LiquidaError::ParseError(format!("failed to open xlsx: {e}")))?;

    let names = workbook.sheet_names().to_vec();

    let activity_sheet = find_sheet(&names, ACTIVITY_SHEETS).ok_or_else(|| {
        LiquidaError::ParseError(format!(
            "no activities sheet found (looked for {}; workbook has {})",
            ACTIVITY_SHEETS.join(", "),
            names.join(", ")
        ))
    })?;
    let range = workbook
        .worksheet_range(&activity_sheet)
        .map_err(|e| LiquidaError::ParseError(format!("sheet '{activity_sheet}': {e}")))?;
    let activities = range_to_rows(&range);

    let production = match find_sheet(&names, PRODUCTION_SHEETS) {
        Some(name) => {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| LiquidaError::ParseError(format!("sheet '{name}': {e}")))?;
            range_to_rows(&range)
        }
        None => Vec::new(),
    };

    Ok(SheetBatch {
        period,
        activities,
        production,
    })
}

/// Find the first sheet matching one of `aliases`, ignoring case, accents
/// and surrounding whitespace. Alias order decides between several matches.
fn find_sheet(names: &[String], aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        let wanted = fold_diacritics(alias.trim());
        names
            .iter()
            .find(|n| fold_diacritics(n.trim()) == wanted)
            .cloned()
    })
}

/// Turn a sheet range into rows keyed by the first row's header text.
/// Columns with a blank header and rows with no content are skipped.
pub fn range_to_rows(range: &Range<Data>) -> Vec<SheetRow> {
    let mut rows_iter = range.rows();
    let headers: Vec<Option<String>> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| match c {
                Data::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Data::Empty | Data::Error(_) => None,
                Data::String(_) => None,
                other => Some(format!("{other}")),
            })
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for data_row in rows_iter {
        let mut row = SheetRow::new();
        for (header, cell) in headers.iter().zip(data_row.iter()) {
            if let Some(h) = header {
                row.insert(h.clone(), cell_value(cell));
            }
        }
        if row.values().any(|v| v.as_text().is_some()) {
            rows.push(row);
        }
    }
    rows
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
