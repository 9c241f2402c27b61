use rust_decimal::Decimal;

use crate::extraction::SheetRow;
use crate::parsing::values::{parse_day_count, parse_percentage, parse_positive_amount};

/// Accepted column headers for one logical field, in lookup order.
///
/// Source exports changed header spelling over time (accents, stray
/// trailing spaces, a latin-1 mis-decode), so each field keeps every
/// spelling seen so far. Extend the lists rather than adding branches.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
}

// Activities sheet

pub const ACTIVITY_TECHNICIAN: FieldAliases = FieldAliases {
    field: "technician",
    aliases: &[
        "TECNICO",
        "TECNICO ",
        "TÉCNICO",
        "TÉCNICO ",
        "TÃ‰CNICO",
        "Tecnico",
        "Técnico",
        "NOMBRE TECNICO",
        "NOMBRE TÉCNICO",
        "tecnico",
    ],
};

pub const ACTIVITY_NET_VALUE: FieldAliases = FieldAliases {
    field: "net value",
    aliases: &[
        "VALOR NETO",
        "VALOR NETO ",
        "NETO",
        "VALOR TECNICO",
        "VALOR TÉCNICO",
        "VALOR",
        "valor_neto",
    ],
};

/// Value before the tipología discount. Consulted only when no net column
/// holds a positive amount.
pub const ACTIVITY_GROSS_VALUE: FieldAliases = FieldAliases {
    field: "gross value",
    aliases: &[
        "PROD TECNICO FINAL",
        "PROD TÉCNICO FINAL",
        "PROD TECNICO FINAL ",
        "prod_tecnico_final",
        "VALOR BRUTO",
        "valor_bruto",
    ],
};

pub const ACTIVITY_TASK_CODE: FieldAliases = FieldAliases {
    field: "task code",
    aliases: &["TAREA", "TAREA ", "ID TAREA", "CODIGO", "CÓDIGO", "FORMULARIO", "tarea"],
};

pub const ACTIVITY_TYPE: FieldAliases = FieldAliases {
    field: "activity type",
    aliases: &[
        "TIPO ACTIVIDAD",
        "TIPO DE ACTIVIDAD",
        "TIPO_ACTIVIDAD",
        "tipo_actividad",
        "ACTIVIDAD",
    ],
};

pub const ACTIVITY_LOCATION: FieldAliases = FieldAliases {
    field: "location",
    aliases: &["NOMBRE PUNTO", "NOMBRE DEL PUNTO", "PUNTO", "nombre_punto", "SITIO"],
};

pub const ACTIVITY_WAREHOUSE: FieldAliases = FieldAliases {
    field: "warehouse",
    aliases: &["BODEGA", "BODEGA ", "ZONA", "ZONA COORDINADOR", "zona_coordinador", "bodega"],
};

pub const ACTIVITY_DEPARTMENT: FieldAliases = FieldAliases {
    field: "department",
    aliases: &["DEPARTAMENTO", "DEPARTAMENTO ", "DPTO", "departamento"],
};

pub const ACTIVITY_CITY: FieldAliases = FieldAliases {
    field: "city",
    aliases: &["CIUDAD", "CIUDAD ", "MUNICIPIO", "ciudad"],
};

pub const ACTIVITY_VENUE_CITY: FieldAliases = FieldAliases {
    field: "venue city",
    aliases: &["CIUDAD SEDE", "CIUDAD_SEDE", "ciudad_sede", "SEDE"],
};

pub const ACTIVITY_TAG: FieldAliases = FieldAliases {
    field: "classification tag",
    aliases: &[
        "TIPIFICACION",
        "TIPIFICACIÓN",
        "TIPIFICACIÃ“N",
        "TIPOLOGIA",
        "TIPOLOGÍA",
        "tipologia",
    ],
};

pub const ACTIVITY_CLOSE_DATE: FieldAliases = FieldAliases {
    field: "close date",
    aliases: &[
        "FECHA CIERRE",
        "FECHA DE CIERRE",
        "FECHA CIERRE PLATAFORMA CLIENTE",
        "fecha_cierre_plataforma_cliente",
        "FECHA FIN",
        "fecha_fin",
        "FECHA",
    ],
};

// Production sheet

pub const PRODUCTION_TECHNICIAN: FieldAliases = FieldAliases {
    field: "technician",
    aliases: &[
        "TECNICO",
        "TECNICO ",
        "TÉCNICO",
        "TÉCNICO ",
        "TÃ‰CNICO",
        "NOMBRE",
        "NOMBRE TECNICO",
        "NOMBRE TÉCNICO",
        "Tecnico",
        "Técnico",
    ],
};

pub const PRODUCTION_TOTAL: FieldAliases = FieldAliases {
    field: "production total",
    aliases: &[
        "TOTAL PRODUCCION",
        "TOTAL PRODUCCIÓN",
        "TOTAL PRODUCCIÃ“N",
        "PRODUCCION",
        "PRODUCCIÓN",
        "RECAUDO",
        "TOTAL RECAUDADO",
        "NETO RECAUDADO",
        "TOTAL NETO",
        "TOTAL",
    ],
};

pub const PRODUCTION_GOAL: FieldAliases = FieldAliases {
    field: "goal",
    aliases: &["META", "META ", "META ASIGNADA", "META MENSUAL", "META_ASIGNADA"],
};

pub const PRODUCTION_COMPLIANCE: FieldAliases = FieldAliases {
    field: "compliance",
    aliases: &[
        "% CUMPLIMIENTO",
        "%CUMPLIMIENTO",
        "CUMPLIMIENTO",
        "CUMPLIMIENTO %",
        "PORCENTAJE CUMPLIMIENTO",
    ],
};

pub const PRODUCTION_WORKED_DAYS: FieldAliases = FieldAliases {
    field: "worked days",
    aliases: &[
        "DIAS LABORADOS",
        "DÍAS LABORADOS",
        "DIAS TRABAJADOS",
        "DÍAS TRABAJADOS",
        "DIAS",
        "dias_laborados",
    ],
};

/// Generic "first present wins" lookup: try each alias in order and return
/// the first value for which `extract` yields something.
pub fn resolve<T>(
    row: &SheetRow,
    field: &FieldAliases,
    extract: impl Fn(&crate::extraction::CellValue) -> Option<T>,
) -> Option<T> {
    field
        .aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find_map(extract)
}

/// First non-blank text value.
pub fn resolve_text(row: &SheetRow, field: &FieldAliases) -> Option<String> {
    resolve(row, field, |c| c.as_text())
}

/// Text value or an empty string.
pub fn text_or_empty(row: &SheetRow, field: &FieldAliases) -> String {
    resolve_text(row, field).unwrap_or_default()
}

/// First alias whose value parses to a strictly positive amount.
pub fn resolve_positive_amount(row: &SheetRow, field: &FieldAliases) -> Option<Decimal> {
    resolve(row, field, parse_positive_amount)
}

pub fn resolve_percentage(row: &SheetRow, field: &FieldAliases) -> Option<Decimal> {
    resolve(row, field, parse_percentage)
}

pub fn resolve_day_count(row: &SheetRow, field: &FieldAliases) -> Option<u32> {
    resolve(row, field, parse_day_count)
}
