pub mod dto;
pub mod files;

use std::fmt;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

use crate::aggregate::{aggregate, MonthAggregate};
use crate::error::LiquidaError;
use crate::extraction::SheetRow;
use crate::merge::{merge, merge_record, MergeSummary};
use crate::model::Period;
use crate::parsing::{parse_activity_rows, parse_production_rows};
use crate::roster::Roster;
use crate::settings::schema::DiscountTable;
use crate::zones::ZoneClassifier;
use crate::Dashboard;

pub use dto::{BulkDataset, FeedDocument, FeedEntry};
pub use files::{FeedFile, WorkbookFile};

/// Raw rows of one month's workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetBatch {
    pub period: Period,
    pub activities: Vec<SheetRow>,
    pub production: Vec<SheetRow>,
}

#[derive(Debug, Clone)]
pub enum SourceBatch {
    Sheets(SheetBatch),
    Feed(FeedDocument),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Workbook,
    Feed,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Workbook => write!(f, "workbook"),
            SourceKind::Feed => write!(f, "feed"),
        }
    }
}

/// Anything that can hand over one monthly source batch.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Short name used in logs and load reports.
    fn label(&self) -> String;

    fn kind(&self) -> SourceKind;

    async fn fetch(&self) -> Result<SourceBatch, LiquidaError>;
}

/// Order in which fetched batches are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeOrder {
    /// Workbooks first, then feeds, each group in listed order.
    #[default]
    FeedLast,
    AsListed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSource {
    pub label: String,
    pub kind: SourceKind,
    pub reason: String,
}

/// Outcome of merging one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub periods: Vec<Period>,
    pub merged: MergeSummary,
    /// Rows dropped by the parsers (workbooks only).
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Labels of merged sources, in merge order.
    pub merged_sources: Vec<String>,
    pub skipped: Vec<SkippedSource>,
    pub merged: MergeSummary,
    pub dropped_rows: usize,
}

/// Fetch every source concurrently, then merge the successful batches into
/// the dashboard one at a time. A failing source is skipped and reported.
pub async fn load_sources(
    dashboard: &mut Dashboard,
    providers: &[Box<dyn SourceProvider>],
    order: MergeOrder,
) -> LoadReport {
    let fetched = join_all(providers.iter().map(|p| p.fetch())).await;

    let mut results: Vec<(&dyn SourceProvider, Result<SourceBatch, LiquidaError>)> = providers
        .iter()
        .map(|p| p.as_ref())
        .zip(fetched)
        .collect();
    if order == MergeOrder::FeedLast {
        results.sort_by_key(|(p, _)| match p.kind() {
            SourceKind::Workbook => 0,
            SourceKind::Feed => 1,
        });
    }

    let mut report = LoadReport::default();
    for (provider, result) in results {
        let label = provider.label();
        match result {
            Ok(batch) => {
                let batch_report = dashboard.apply_batch(batch);
                report.merged.absorb(batch_report.merged);
                report.dropped_rows += batch_report.dropped_rows;
                report.merged_sources.push(label);
            }
            Err(e) => {
                warn!(target: "liquida::ingest", source = %label, error = %e, "source skipped");
                report.skipped.push(SkippedSource {
                    label,
                    kind: provider.kind(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        target: "liquida::ingest",
        merged_sources = report.merged_sources.len(),
        skipped_sources = report.skipped.len(),
        created = report.merged.created,
        appended = report.merged.appended,
        replaced = report.merged.replaced,
        unchanged = report.merged.unchanged,
        "sources loaded"
    );
    report
}

/// Parse, aggregate and merge one batch. `discounts` applies to workbook
/// rows that carry only a gross value; feed tasks arrive already valued.
pub fn apply_batch(
    roster: &mut Roster,
    zones: &ZoneClassifier,
    discounts: &DiscountTable,
    batch: SourceBatch,
) -> BatchReport {
    match batch {
        SourceBatch::Sheets(sheets) => {
            let activities = parse_activity_rows(&sheets.activities, zones, discounts);
            let production = parse_production_rows(&sheets.production);
            let agg = aggregate(&activities.records, &production.records, &sheets.period);
            BatchReport {
                periods: vec![sheets.period],
                merged: merge(roster, agg),
                dropped_rows: activities.dropped() + production.dropped(),
            }
        }
        SourceBatch::Feed(feed) => {
            let mut report = BatchReport::default();
            for (label, entries) in feed.periods {
                let period = Period::new(label);
                let mut agg = MonthAggregate::new(period.clone());
                for entry in entries {
                    if entry.nombre.is_empty() {
                        report.dropped_rows += 1;
                        continue;
                    }
                    agg.upsert(&entry.nombre, entry.figures.into_record(period.clone(), zones));
                }
                report.merged.absorb(merge(roster, agg));
                report.periods.push(period);
            }
            report
        }
    }
}

/// Seed the roster from the bulk export through the regular merge path.
pub fn apply_bulk(roster: &mut Roster, zones: &ZoneClassifier, dataset: BulkDataset) -> MergeSummary {
    let mut summary = MergeSummary::default();
    for technician in dataset.tecnicos {
        if technician.nombre.is_empty() {
            continue;
        }
        for month in technician.meses {
            let record = month.figures.into_record(Period::new(month.mes), zones);
            summary.record(merge_record(roster, &technician.nombre, record));
        }
    }
    info!(
        target: "liquida::ingest",
        technicians = roster.len(),
        created = summary.created,
        appended = summary.appended,
        "bulk dataset loaded"
    );
    summary
}
