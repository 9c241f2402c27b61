use crate::model::Zone;
use crate::parsing::normalize::fold_diacritics;
use crate::settings::schema::ZoneTable;

/// Department-only fallback, consulted when no keyword matched.
const DEPARTMENT_FALLBACK: &[(&str, Zone)] = &[
    ("ANTIOQUIA", Zone::Noroccidente),
    ("VALLE", Zone::SuroccidenteEjeCafetero),
    ("RISARALDA", Zone::SuroccidenteEjeCafetero),
    ("QUINDIO", Zone::SuroccidenteEjeCafetero),
    ("CALDAS", Zone::SuroccidenteEjeCafetero),
    ("CUNDINAMARCA", Zone::Cundinamarca),
    ("ATLANTICO", Zone::Costa),
    ("BOLIVAR", Zone::Costa),
    ("MAGDALENA", Zone::Costa),
    ("CORDOBA", Zone::Costa),
    ("SUCRE", Zone::Costa),
    ("CESAR", Zone::Costa),
    ("GUAJIRA", Zone::Costa),
    ("SANTANDER", Zone::Santanderes),
];

/// Maps free-text location fields to a macro-zone.
///
/// Keywords are folded (accents stripped, uppercased) once at
/// construction. Zones are tried in table order and the first zone with
/// any matching keyword wins.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    entries: Vec<(Zone, Vec<String>)>,
}

impl ZoneClassifier {
    pub fn new(table: &ZoneTable) -> Self {
        let entries = table
            .zones
            .iter()
            .map(|z| {
                let keywords = z
                    .keywords
                    .iter()
                    .map(|k| fold_diacritics(k.trim()))
                    .filter(|k| !k.is_empty())
                    .collect();
                (z.zone, keywords)
            })
            .collect();
        ZoneClassifier { entries }
    }

    /// Classify a task location.
    ///
    /// Order: keyword match over all four fields, then the department-only
    /// fallback list, then `REMOTAS` for any other non-empty department.
    /// `SIN_ZONA` only when nothing matched and the department is blank.
    pub fn classify(&self, warehouse: &str, department: &str, city: &str, venue_city: &str) -> Zone {
        let search = fold_diacritics(&format!("{warehouse} {department} {city} {venue_city}"));

        for (zone, keywords) in &self.entries {
            if keywords.iter().any(|k| search.contains(k.as_str())) {
                return *zone;
            }
        }

        let department = fold_diacritics(department.trim());
        if department.is_empty() {
            return Zone::SinZona;
        }
        DEPARTMENT_FALLBACK
            .iter()
            .find(|(name, _)| department.contains(name))
            .map(|(_, zone)| *zone)
            .unwrap_or(Zone::Remotas)
    }
}
