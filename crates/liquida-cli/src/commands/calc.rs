use std::path::PathBuf;

use liquida_core::commission::{compute_commission, effective_goal, percentage_of_goal, GoalStatus};
use liquida_core::error::LiquidaError;
use liquida_core::zones::ZoneClassifier;
use rust_decimal::Decimal;
use serde_json::json;

use super::load::load_settings;
use crate::output;

pub fn commission(
    net_total: Decimal,
    days: Option<u32>,
    commission_file: Option<PathBuf>,
    goal: Option<Decimal>,
    output_format: &str,
) -> Result<(), LiquidaError> {
    let settings = load_settings(commission_file.as_deref(), None, None, goal)?;
    let plan = &settings.commission;
    let goal = effective_goal(plan.monthly_goal, days);
    let outcome = compute_commission(net_total, goal, &plan.tiers);
    let percentage = percentage_of_goal(net_total, plan.monthly_goal);

    match output_format {
        "json" => output::json::print(&json!({
            "net_total": net_total,
            "base_goal": plan.monthly_goal,
            "effective_goal": goal,
            "percentage": percentage,
            "status": GoalStatus::from_percentage(percentage),
            "outcome": outcome,
        }))?,
        _ => output::table::print_commission(net_total, plan.monthly_goal, goal, percentage, &outcome),
    }
    Ok(())
}

pub fn zone(
    warehouse: &str,
    department: &str,
    city: &str,
    venue_city: &str,
    zones_file: Option<PathBuf>,
) -> Result<(), LiquidaError> {
    let settings = load_settings(None, zones_file.as_deref(), None, None)?;
    let classifier = ZoneClassifier::new(&settings.zones);
    let zone = classifier.classify(warehouse, department, city, venue_city);
    println!("{} ({})", zone, zone.code());
    Ok(())
}
