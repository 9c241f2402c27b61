use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsing::normalize::fold_diacritics;

/// Coarse bucket for a task's activity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Cierre,
    Incidente,
    Implementacion,
    Pos,
    OrdenCambio,
    Visita,
    #[default]
    Otra,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::Cierre => "Cierre",
            ActivityKind::Incidente => "Incidente",
            ActivityKind::Implementacion => "Implementación",
            ActivityKind::Pos => "POS",
            ActivityKind::OrdenCambio => "Orden de cambio",
            ActivityKind::Visita => "Visita",
            ActivityKind::Otra => "Otra",
        };
        write!(f, "{s}")
    }
}

/// Substring rules, checked in order.
const KIND_RULES: &[(&[&str], ActivityKind)] = &[
    (&["CIERRE"], ActivityKind::Cierre),
    (&["INCIDENTE", "SOPORTE", "CORRECTIVO"], ActivityKind::Incidente),
    (
        &["IMPLEMENTACION", "INSTALACION", "APERTURA", "MIGRACION"],
        ActivityKind::Implementacion,
    ),
    (&["POS", "DATAFONO", "ENVIO", "RETIRO"], ActivityKind::Pos),
    (&["OC", "ORDEN"], ActivityKind::OrdenCambio),
    (&["ROLLO", "VISITA"], ActivityKind::Visita),
];

/// Bucket an activity-type string. Accents and case are ignored.
pub fn classify_activity_kind(activity_type: &str) -> ActivityKind {
    let text = fold_diacritics(activity_type);
    if text.trim().is_empty() {
        return ActivityKind::Otra;
    }
    KIND_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ActivityKind::Otra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_in_order() {
        assert_eq!(classify_activity_kind("Cierre de punto"), ActivityKind::Cierre);
        assert_eq!(classify_activity_kind("Soporte técnico"), ActivityKind::Incidente);
        assert_eq!(classify_activity_kind("Instalación"), ActivityKind::Implementacion);
        assert_eq!(classify_activity_kind("Retiro datáfono"), ActivityKind::Pos);
        assert_eq!(classify_activity_kind("Orden de cambio"), ActivityKind::OrdenCambio);
        assert_eq!(classify_activity_kind("Entrega de rollos"), ActivityKind::Visita);
    }

    #[test]
    fn test_earlier_rule_wins() {
        // "cierre" is checked before "incidente"
        assert_eq!(classify_activity_kind("Cierre incidente"), ActivityKind::Cierre);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(classify_activity_kind("Capacitación"), ActivityKind::Otra);
        assert_eq!(classify_activity_kind(""), ActivityKind::Otra);
    }
}
