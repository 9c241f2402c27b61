use liquida_core::error::LiquidaError;
use liquida_core::model::{Period, ZoneFilter};
use liquida_core::report::TechnicianMonthReport;
use liquida_core::Dashboard;

use super::load::build_dashboard;
use crate::output;
use crate::SourceArgs;

fn resolve_period(dashboard: &Dashboard, period: Option<String>) -> Result<Period, LiquidaError> {
    match period {
        Some(label) => Ok(Period::new(label)),
        None => dashboard.latest_period(),
    }
}

pub async fn periods(sources: &SourceArgs, output_format: &str) -> Result<(), LiquidaError> {
    let dashboard = build_dashboard(sources).await?;
    let periods = dashboard.available_periods();
    match output_format {
        "json" => output::json::print(&periods)?,
        _ => output::table::print_periods(&periods),
    }
    Ok(())
}

pub async fn rank(
    sources: &SourceArgs,
    period: Option<String>,
    zone: ZoneFilter,
    output_format: &str,
) -> Result<(), LiquidaError> {
    let dashboard = build_dashboard(sources).await?;
    let period = resolve_period(&dashboard, period)?;
    let ranking = dashboard.rank(&period, zone);
    match output_format {
        "json" => output::json::print(&ranking)?,
        _ => output::table::print_ranking(&ranking),
    }
    Ok(())
}

pub async fn tech(
    sources: &SourceArgs,
    name: &str,
    period: Option<String>,
    output_format: &str,
) -> Result<(), LiquidaError> {
    let dashboard = build_dashboard(sources).await?;
    let technician = dashboard.technician(name)?;

    let periods: Vec<Period> = match period {
        Some(label) => vec![Period::new(label)],
        None => dashboard
            .available_periods()
            .into_iter()
            .filter(|p| technician.month(p).is_some())
            .collect(),
    };

    let reports = periods
        .iter()
        .map(|p| dashboard.month_report(name, p))
        .collect::<Result<Vec<TechnicianMonthReport>, _>>()?;

    match output_format {
        "json" => output::json::print(&reports)?,
        _ => output::table::print_reports(&technician.name, &reports),
    }
    Ok(())
}

pub async fn search(
    sources: &SourceArgs,
    query: &str,
    period: Option<String>,
    output_format: &str,
) -> Result<(), LiquidaError> {
    let dashboard = build_dashboard(sources).await?;
    let period = resolve_period(&dashboard, period)?;
    let hits = dashboard.search(query, &period);
    match output_format {
        "json" => output::json::print(&hits)?,
        _ => output::table::print_search(query, &period, &hits),
    }
    Ok(())
}

pub async fn summary(sources: &SourceArgs, output_format: &str) -> Result<(), LiquidaError> {
    let dashboard = build_dashboard(sources).await?;
    let summary = dashboard.summary();
    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print_summary(&summary),
    }
    Ok(())
}
