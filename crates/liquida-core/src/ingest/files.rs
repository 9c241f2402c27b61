use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::dto::FeedDocument;
use super::{SourceBatch, SourceKind, SourceProvider};
use crate::error::LiquidaError;
use crate::extraction::xlsx::read_workbook;
use crate::model::Period;

fn unavailable(path: &Path, reason: impl ToString) -> LiquidaError {
    LiquidaError::SourceUnavailable {
        source_label: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// A monthly `.xlsx` workbook on disk.
#[derive(Debug, Clone)]
pub struct WorkbookFile {
    pub path: PathBuf,
    /// Defaults to the file stem, e.g. `2026-02.xlsx` is period `2026-02`.
    pub period: Option<Period>,
}

impl WorkbookFile {
    pub fn new(path: impl Into<PathBuf>, period: Option<Period>) -> Self {
        WorkbookFile {
            path: path.into(),
            period,
        }
    }

    pub fn period(&self) -> Result<Period, LiquidaError> {
        if let Some(p) = &self.period {
            return Ok(p.clone());
        }
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(Period::new)
            .filter(|p| !p.label().is_empty())
            .ok_or_else(|| unavailable(&self.path, "cannot infer period from file name"))
    }
}

#[async_trait]
impl SourceProvider for WorkbookFile {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Workbook
    }

    async fn fetch(&self) -> Result<SourceBatch, LiquidaError> {
        let period = self.period()?;
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        let batch = read_workbook(&bytes, period).map_err(|e| unavailable(&self.path, e))?;
        Ok(SourceBatch::Sheets(batch))
    }
}

/// A supplementary JSON feed on disk.
#[derive(Debug, Clone)]
pub struct FeedFile {
    pub path: PathBuf,
}

impl FeedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FeedFile { path: path.into() }
    }
}

#[async_trait]
impl SourceProvider for FeedFile {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    async fn fetch(&self) -> Result<SourceBatch, LiquidaError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;
        let doc = FeedDocument::from_slice(&bytes).map_err(|e| unavailable(&self.path, e))?;
        Ok(SourceBatch::Feed(doc))
    }
}
