use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical identity key for a technician name.
///
/// Trims, uppercases and collapses every whitespace run to a single space.
/// Two renderings of the same name that differ only in case or spacing
/// produce the same key.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Strip diacritics and uppercase, for accent-insensitive comparisons.
///
/// `"Medellín"` and `"MEDELLIN"` fold to the same string.
pub fn fold_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_spacing() {
        assert_eq!(normalize_name("  juan   carlos\tpérez "), "JUAN CARLOS PÉREZ");
        assert_eq!(
            normalize_name("Juan Carlos Pérez"),
            normalize_name("JUAN  CARLOS   PÉREZ")
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   \n "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["ana maría ", "  ÑUÑO\t\tgarcía", "straße", "x", "", " a  b  c "] {
            let once = normalize_name(s);
            assert_eq!(normalize_name(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold_diacritics("Medellín"), "MEDELLIN");
        assert_eq!(fold_diacritics("Bogotá D.C."), "BOGOTA D.C.");
        assert_eq!(fold_diacritics("Nariño"), "NARINO");
        assert_eq!(fold_diacritics("Itagüí"), "ITAGUI");
    }
}
