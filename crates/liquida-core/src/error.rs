use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LiquidaError {
    #[error("source '{source_label}' unavailable: {reason}")]
    SourceUnavailable { source_label: String, reason: String },

    #[error("technician '{0}' not found")]
    TechnicianNotFound(String),

    #[error("technician '{technician}' has no record for period '{period}'")]
    PeriodNotFound { technician: String, period: String },

    #[error("no periods available in the loaded data")]
    NoPeriods,

    #[error("failed to load settings from {path}: {reason}")]
    SettingsLoad { path: PathBuf, reason: String },

    #[error("invalid settings: {0}")]
    SettingsInvalid(String),

    #[error("failed to parse source data: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
