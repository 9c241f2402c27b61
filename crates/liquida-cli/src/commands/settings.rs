use std::path::PathBuf;

use liquida_core::error::LiquidaError;
use liquida_core::settings::{self, builtin};

use crate::output;

pub fn show() -> Result<(), LiquidaError> {
    let defaults = builtin::load_default()?;
    output::table::print_settings(&defaults);
    Ok(())
}

pub fn validate(
    commission: Option<PathBuf>,
    zones: Option<PathBuf>,
    discounts: Option<PathBuf>,
) -> Result<(), LiquidaError> {
    if commission.is_none() && zones.is_none() && discounts.is_none() {
        return Err(LiquidaError::SettingsInvalid(
            "nothing to validate; pass --commission, --zones or --discounts".into(),
        ));
    }
    if let Some(path) = commission {
        let plan = settings::load_commission_plan(&path)?;
        println!(
            "OK: {} (v{}), {} tiers, monthly goal {}",
            plan.name,
            plan.version,
            plan.tiers.len(),
            output::table::format_currency(plan.monthly_goal)
        );
    }
    if let Some(path) = zones {
        let table = settings::load_zone_table(&path)?;
        let keywords: usize = table.zones.iter().map(|z| z.keywords.len()).sum();
        println!(
            "OK: {} (v{}), {} zones, {} keywords",
            table.name,
            table.version,
            table.zones.len(),
            keywords
        );
    }
    if let Some(path) = discounts {
        let table = settings::load_discount_table(&path)?;
        println!(
            "OK: {} (v{}), {} tags",
            table.name,
            table.version,
            table.rates.len()
        );
    }
    Ok(())
}
