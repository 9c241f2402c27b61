use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use liquida_core::error::LiquidaError;
use liquida_core::ingest::{load_sources, BulkDataset, FeedFile, MergeOrder, SourceProvider, WorkbookFile};
use liquida_core::model::Period;
use liquida_core::settings::{self, builtin, schema::Settings};
use liquida_core::Dashboard;
use rust_decimal::Decimal;
use tracing::debug;

use crate::SourceArgs;

/// Built-in settings with any file or goal overrides applied.
pub fn load_settings(
    commission: Option<&Path>,
    zones: Option<&Path>,
    discounts: Option<&Path>,
    goal: Option<Decimal>,
) -> Result<Settings, LiquidaError> {
    let mut loaded = builtin::load_default()?;
    if let Some(path) = commission {
        loaded.commission = settings::load_commission_plan(path)?;
    }
    if let Some(path) = zones {
        loaded.zones = settings::load_zone_table(path)?;
    }
    if let Some(path) = discounts {
        loaded.discounts = settings::load_discount_table(path)?;
    }
    if let Some(goal) = goal {
        loaded.commission.monthly_goal = goal;
        settings::validate_commission_plan(&loaded.commission)?;
    }
    Ok(loaded)
}

/// Build the dashboard from the bulk export and every monthly source.
pub async fn build_dashboard(args: &SourceArgs) -> Result<Dashboard, LiquidaError> {
    if args.bulk.is_none() && args.workbooks.is_empty() && args.feeds.is_empty() {
        return Err(LiquidaError::ParseError(
            "no data given; use --bulk, --workbook or --feed".into(),
        ));
    }

    let settings = load_settings(
        args.commission.as_deref(),
        args.zones.as_deref(),
        args.discounts.as_deref(),
        args.goal,
    )?;
    let mut dashboard = Dashboard::new(settings);

    if let Some(path) = &args.bulk {
        let summary = dashboard.load_bulk(read_bulk(path).await?);
        debug!(target: "liquida::cli", path = %path.display(), created = summary.created, "bulk dataset read");
    }

    let mut providers: Vec<Box<dyn SourceProvider>> = Vec::new();
    for arg in &args.workbooks {
        providers.push(Box::new(parse_workbook_arg(arg)));
    }
    for path in &args.feeds {
        providers.push(Box::new(FeedFile::new(path)));
    }

    if !providers.is_empty() {
        let order = if args.as_listed {
            MergeOrder::AsListed
        } else {
            MergeOrder::FeedLast
        };
        let report = load_sources(&mut dashboard, &providers, order).await;
        debug!(
            target: "liquida::cli",
            merged = ?report.merged_sources,
            skipped = report.skipped.len(),
            dropped_rows = report.dropped_rows,
            "monthly sources applied"
        );
    }

    Ok(dashboard)
}

/// Read the bulk export. A failure here fails the whole command.
async fn read_bulk(path: &Path) -> Result<BulkDataset, LiquidaError> {
    let raw = tokio::fs::read(path).await?;
    let bytes = if is_gzip(path) {
        let mut out = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut out)
            .map_err(|e| LiquidaError::ParseError(format!("{}: {e}", path.display())))?;
        out
    } else {
        raw
    };
    BulkDataset::from_slice(&bytes)
        .map_err(|e| LiquidaError::ParseError(format!("{}: {e}", path.display())))
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// `2026-02=febrero.xlsx` or just `2026-02.xlsx`.
fn parse_workbook_arg(arg: &str) -> WorkbookFile {
    match arg.split_once('=') {
        Some((period, path)) if !period.trim().is_empty() => {
            WorkbookFile::new(PathBuf::from(path), Some(Period::new(period)))
        }
        _ => WorkbookFile::new(PathBuf::from(arg), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_workbook_arg_with_period() {
        let w = parse_workbook_arg("2026-02=/data/febrero.xlsx");
        assert_eq!(w.path, PathBuf::from("/data/febrero.xlsx"));
        assert_eq!(w.period, Some(Period::new("2026-02")));
    }

    #[test]
    fn test_workbook_arg_plain_path() {
        let w = parse_workbook_arg("/data/2026-02.xlsx");
        assert_eq!(w.period, None);
    }

    #[test]
    fn test_goal_override_validated() {
        assert!(load_settings(None, None, None, Some(Decimal::ZERO)).is_err());
        let s = load_settings(None, None, None, Some(Decimal::from(5_000_000))).unwrap();
        assert_eq!(s.commission.monthly_goal, Decimal::from(5_000_000));
    }

    #[tokio::test]
    async fn test_read_gzipped_bulk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json.gz");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(br#"{"tecnicos": [{"nombre": "Ana", "meses": []}]}"#)
            .unwrap();
        std::fs::write(&path, enc.finish().unwrap()).unwrap();

        let ds = read_bulk(&path).await.unwrap();
        assert_eq!(ds.tecnicos.len(), 1);
    }

    #[tokio::test]
    async fn test_no_sources_is_an_error() {
        let err = build_dashboard(&SourceArgs::default()).await.unwrap_err();
        assert!(err.to_string().contains("--bulk"));
    }
}
