//! Wire shapes of the JSON exports: the bulk dataset and the supplementary
//! per-period feed. Numeric fields accept JSON numbers or numeric strings;
//! text fields accept numbers too, since task codes are often numeric.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::activity::classify_activity_kind;
use crate::extraction::CellValue;
use crate::model::{MonthRecord, Period, Task};
use crate::parsing::values::{parse_amount, parse_day_count, round_currency};
use crate::zones::ZoneClassifier;

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<CellValue>::deserialize(d)?
        .and_then(|c| c.as_text())
        .unwrap_or_default())
}

fn lenient_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
    Ok(Option::<CellValue>::deserialize(d)?
        .as_ref()
        .and_then(parse_amount)
        .unwrap_or(Decimal::ZERO))
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<CellValue>::deserialize(d)?
        .as_ref()
        .and_then(parse_day_count))
}

/// One task as exported (`tareas[]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskDto {
    #[serde(deserialize_with = "lenient_text")]
    pub tarea: String,
    #[serde(deserialize_with = "lenient_text")]
    pub numero_tarea: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tipo_actividad: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tipo_origen: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tipo: String,
    #[serde(deserialize_with = "lenient_text")]
    pub nombre_punto: String,
    #[serde(deserialize_with = "lenient_text")]
    pub bodega: String,
    #[serde(deserialize_with = "lenient_text")]
    pub departamento: String,
    #[serde(deserialize_with = "lenient_text")]
    pub ciudad: String,
    #[serde(deserialize_with = "lenient_text")]
    pub ciudad_sede: String,
    #[serde(deserialize_with = "lenient_text")]
    pub tipificacion: String,
    #[serde(deserialize_with = "lenient_text")]
    pub fecha_cierre: String,
    #[serde(deserialize_with = "lenient_text")]
    pub fecha_resolucion: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub valor_bruto: Decimal,
    /// Percent, as exported (`30` for 30%).
    #[serde(deserialize_with = "lenient_amount")]
    pub porcentaje_descuento: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub valor_descuento: Decimal,
    #[serde(deserialize_with = "lenient_amount")]
    pub valor_neto: Decimal,
}

fn first_non_empty(candidates: [&String; 3]) -> String {
    candidates
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}

impl TaskDto {
    /// Build a [`Task`], classifying its zone from its own location fields.
    ///
    /// Exports without a gross value report the net as gross, undiscounted.
    pub fn into_task(self, zones: &ZoneClassifier) -> Task {
        let empty = String::new();
        let activity_type = first_non_empty([&self.tipo_actividad, &self.tipo_origen, &self.tipo]);
        let code = first_non_empty([&self.tarea, &self.numero_tarea, &empty]);
        let closed_at = first_non_empty([&self.fecha_cierre, &self.fecha_resolucion, &empty]);
        let zone = zones.classify(&self.bodega, &self.departamento, &self.ciudad, &self.ciudad_sede);
        let gross_value = if self.valor_bruto.is_zero() {
            self.valor_neto
        } else {
            self.valor_bruto
        };
        Task {
            code,
            kind: classify_activity_kind(&activity_type),
            activity_type,
            location: self.nombre_punto,
            warehouse: self.bodega,
            department: self.departamento,
            city: self.ciudad,
            zone,
            tag: self.tipificacion,
            closed_at,
            gross_value,
            discount_rate: self.porcentaje_descuento / Decimal::ONE_HUNDRED,
            discount_value: self.valor_descuento,
            net_value: self.valor_neto,
        }
    }
}

/// Month figures shared by both export shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthFigures {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_neto: Decimal,
    /// Falls back to the length of `tareas` when absent.
    #[serde(default, deserialize_with = "lenient_count")]
    pub cantidad_tareas: Option<u32>,
    #[serde(default)]
    pub tareas: Vec<TaskDto>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub dias_laborados: Option<u32>,
}

impl MonthFigures {
    pub fn into_record(self, period: Period, zones: &ZoneClassifier) -> MonthRecord {
        let task_count = self
            .cantidad_tareas
            .unwrap_or(u32::try_from(self.tareas.len()).unwrap_or(u32::MAX));
        MonthRecord {
            period,
            net_total: round_currency(self.total_neto),
            task_count,
            tasks: self.tareas.into_iter().map(|t| t.into_task(zones)).collect(),
            worked_days: self.dias_laborados,
        }
    }
}

/// One technician in a feed period.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    #[serde(deserialize_with = "lenient_text")]
    pub nombre: String,
    #[serde(flatten)]
    pub figures: MonthFigures,
}

/// Supplementary feed: period label to per-technician aggregates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FeedDocument {
    pub periods: BTreeMap<String, Vec<FeedEntry>>,
}

impl FeedDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkMonth {
    #[serde(deserialize_with = "lenient_text")]
    pub mes: String,
    #[serde(flatten)]
    pub figures: MonthFigures,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkTechnician {
    #[serde(deserialize_with = "lenient_text")]
    pub nombre: String,
    #[serde(default)]
    pub meses: Vec<BulkMonth>,
}

/// The full historical export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDataset {
    /// Export-side summary, kept as-is. The roster summary is recomputed.
    #[serde(default)]
    pub resumen: Option<serde_json::Value>,
    #[serde(default)]
    pub tecnicos: Vec<BulkTechnician>,
}

impl BulkDataset {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::model::Zone;
    use crate::settings::builtin::default_zone_table;
    use rust_decimal_macros::dec;

    fn zones() -> ZoneClassifier {
        ZoneClassifier::new(&default_zone_table().unwrap())
    }

    #[test]
    fn test_bulk_numbers_and_strings() {
        let json = r#"{
            "resumen": {"total_tecnicos": 1},
            "tecnicos": [{
                "nombre": "Ana Gómez",
                "total_general": 123,
                "meses": [{
                    "mes": "February 2026",
                    "total_neto": "5800000.4",
                    "cantidad_tareas": 2,
                    "tareas": [
                        {"tarea": 10452, "tipo_origen": "INCIDENTE", "tipo_actividad": "Cierre de incidente",
                         "departamento": "Antioquia", "ciudad": "Medellín", "valor_neto": 120000.5,
                         "fecha_cierre": "2026-02-10 09:30:00"},
                        {"numero_tarea": "T-2", "tipo": "Visita", "departamento": null, "valor_neto": null}
                    ]
                }]
            }]
        }"#;
        let ds = BulkDataset::from_slice(json.as_bytes()).unwrap();
        assert_eq!(ds.tecnicos.len(), 1);
        let month = ds.tecnicos[0].meses[0].clone();
        assert_eq!(month.mes, "February 2026");
        let rec = month.figures.into_record(Period::new("February 2026"), &zones());
        assert_eq!(rec.net_total, dec!(5800000));
        assert_eq!(rec.task_count, 2);
        assert_eq!(rec.tasks[0].code, "10452");
        assert_eq!(rec.tasks[0].activity_type, "Cierre de incidente");
        assert_eq!(rec.tasks[0].kind, ActivityKind::Cierre);
        assert_eq!(rec.tasks[0].zone, Zone::Noroccidente);
        assert_eq!(rec.tasks[0].net_value, dec!(120000.5));
        assert_eq!(rec.tasks[0].gross_value, dec!(120000.5));
        assert_eq!(rec.tasks[1].code, "T-2");
        assert_eq!(rec.tasks[1].zone, Zone::SinZona);
        assert_eq!(rec.tasks[1].net_value, Decimal::ZERO);
    }

    #[test]
    fn test_task_discount_fields() {
        let json = r#"{"tarea": "T-9", "tipificacion": "TIPO II", "valor_bruto": 100000,
            "porcentaje_descuento": 30.0, "valor_descuento": "30000", "valor_neto": 70000}"#;
        let dto: TaskDto = serde_json::from_str(json).unwrap();
        let task = dto.into_task(&zones());
        assert_eq!(task.gross_value, dec!(100000));
        assert_eq!(task.discount_rate, dec!(0.30));
        assert_eq!(task.discount_value, dec!(30000));
        assert_eq!(task.net_value, dec!(70000));
    }

    #[test]
    fn test_month_total_rounded_half_away_from_zero() {
        let json = r#"{"nombre": "Luis", "total_neto": "1250000.5"}"#;
        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        let rec = entry.figures.into_record(Period::new("2026-02"), &zones());
        assert_eq!(rec.net_total, dec!(1250001));
    }

    #[test]
    fn test_task_count_defaults_to_list_length() {
        let json = r#"{"nombre": "Luis", "total_neto": 10, "tareas": [{}, {}, {}]}"#;
        let entry: FeedEntry = serde_json::from_str(json).unwrap();
        let rec = entry.figures.into_record(Period::new("2026-02"), &zones());
        assert_eq!(rec.task_count, 3);
        assert_eq!(rec.worked_days, None);
    }

    #[test]
    fn test_feed_count_without_list() {
        let json = r#"{"2026-02": [{"nombre": "Luis", "total_neto": 10, "cantidad_tareas": 40, "dias_laborados": "15"}]}"#;
        let doc = FeedDocument::from_slice(json.as_bytes()).unwrap();
        let entry = doc.periods["2026-02"][0].clone();
        let rec = entry.figures.into_record(Period::new("2026-02"), &zones());
        assert_eq!(rec.task_count, 40);
        assert!(rec.tasks.is_empty());
        assert_eq!(rec.worked_days, Some(15));
    }

    #[test]
    fn test_feed_rejects_non_object() {
        assert!(FeedDocument::from_slice(b"[1, 2]").is_err());
    }
}
