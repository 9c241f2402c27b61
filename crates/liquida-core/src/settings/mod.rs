pub mod builtin;
pub mod schema;

use crate::error::LiquidaError;
use crate::model::Zone;
use rust_decimal::Decimal;
use crate::parsing::normalize::normalize_name;
use schema::{CommissionPlan, DiscountTable, ZoneTable};
use std::collections::HashSet;
use std::path::Path;

/// Load a commission plan from a JSON file.
pub fn load_commission_plan(path: &Path) -> Result<CommissionPlan, LiquidaError> {
    let content = read_settings_file(path)?;
    let plan: CommissionPlan =
        serde_json::from_str(&content).map_err(|e| LiquidaError::SettingsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_commission_plan(&plan)?;
    Ok(plan)
}

/// Load a zone keyword table from a JSON file.
pub fn load_zone_table(path: &Path) -> Result<ZoneTable, LiquidaError> {
    let content = read_settings_file(path)?;
    let table: ZoneTable =
        serde_json::from_str(&content).map_err(|e| LiquidaError::SettingsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_zone_table(&table)?;
    Ok(table)
}

/// Load a tipología discount table from a JSON file.
pub fn load_discount_table(path: &Path) -> Result<DiscountTable, LiquidaError> {
    let content = read_settings_file(path)?;
    let table: DiscountTable =
        serde_json::from_str(&content).map_err(|e| LiquidaError::SettingsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_discount_table(&table)?;
    Ok(table)
}

/// Parse a commission plan from a JSON string (no file path context).
pub fn parse_commission_plan_str(json: &str) -> Result<CommissionPlan, LiquidaError> {
    let plan: CommissionPlan = serde_json::from_str(json)?;
    validate_commission_plan(&plan)?;
    Ok(plan)
}

/// Parse a zone table from a JSON string (no file path context).
pub fn parse_zone_table_str(json: &str) -> Result<ZoneTable, LiquidaError> {
    let table: ZoneTable = serde_json::from_str(json)?;
    validate_zone_table(&table)?;
    Ok(table)
}

pub fn parse_discount_table_str(json: &str) -> Result<DiscountTable, LiquidaError> {
    let table: DiscountTable = serde_json::from_str(json)?;
    validate_discount_table(&table)?;
    Ok(table)
}

fn read_settings_file(path: &Path) -> Result<String, LiquidaError> {
    std::fs::read_to_string(path).map_err(|e| LiquidaError::SettingsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Check that the goal is positive and the tiers partition `[0, ∞)`.
///
/// Bands are half-open, so each band must start exactly where the previous
/// one ends, and only the last band may be open-ended.
pub fn validate_commission_plan(plan: &CommissionPlan) -> Result<(), LiquidaError> {
    if plan.monthly_goal <= Decimal::ZERO {
        return Err(LiquidaError::SettingsInvalid(format!(
            "monthly_goal must be positive, got {}",
            plan.monthly_goal
        )));
    }

    let first = plan
        .tiers
        .first()
        .ok_or_else(|| LiquidaError::SettingsInvalid("tiers must not be empty".into()))?;
    if !first.min_excess.is_zero() {
        return Err(LiquidaError::SettingsInvalid(format!(
            "first tier '{}' must start at 0, starts at {}",
            first.label, first.min_excess
        )));
    }

    let last_index = plan.tiers.len() - 1;
    for (i, tier) in plan.tiers.iter().enumerate() {
        if tier.rate < Decimal::ZERO || tier.rate > Decimal::ONE {
            return Err(LiquidaError::SettingsInvalid(format!(
                "tier '{}' has rate {} outside [0, 1]",
                tier.label, tier.rate
            )));
        }

        match tier.max_excess {
            None if i != last_index => {
                return Err(LiquidaError::SettingsInvalid(format!(
                    "tier '{}' is open-ended but is not the last tier",
                    tier.label
                )));
            }
            None => {}
            Some(max) => {
                if max <= tier.min_excess {
                    return Err(LiquidaError::SettingsInvalid(format!(
                        "tier '{}' has max_excess {} not above min_excess {}",
                        tier.label, max, tier.min_excess
                    )));
                }
                match plan.tiers.get(i + 1) {
                    Some(next) if next.min_excess != max => {
                        let kind = if next.min_excess > max { "gap" } else { "overlap" };
                        return Err(LiquidaError::SettingsInvalid(format!(
                            "{kind} between tier '{}' (ends {}) and tier '{}' (starts {})",
                            tier.label, max, next.label, next.min_excess
                        )));
                    }
                    Some(_) => {}
                    None => {
                        return Err(LiquidaError::SettingsInvalid(format!(
                            "last tier '{}' must be open-ended (max_excess: null)",
                            tier.label
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Check that the table lists each of the six macro-zones exactly once,
/// each with at least one keyword.
pub fn validate_zone_table(table: &ZoneTable) -> Result<(), LiquidaError> {
    let mut seen = HashSet::new();
    for entry in &table.zones {
        if entry.zone == Zone::SinZona {
            return Err(LiquidaError::SettingsInvalid(
                "SIN_ZONA is the fallback bucket and takes no keywords".into(),
            ));
        }
        if !seen.insert(entry.zone) {
            return Err(LiquidaError::SettingsInvalid(format!(
                "zone {} is listed more than once",
                entry.zone.code()
            )));
        }
        if entry.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(LiquidaError::SettingsInvalid(format!(
                "zone {} has no keywords",
                entry.zone.code()
            )));
        }
    }

    let missing: Vec<&str> = Zone::MACRO
        .iter()
        .filter(|z| !seen.contains(*z))
        .map(|z| z.code())
        .collect();
    if !missing.is_empty() {
        return Err(LiquidaError::SettingsInvalid(format!(
            "zone table is missing: {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Check that every tag is non-empty, listed once and has a rate in `[0, 1]`.
pub fn validate_discount_table(table: &DiscountTable) -> Result<(), LiquidaError> {
    let mut seen = HashSet::new();
    for entry in &table.rates {
        let key = normalize_name(&entry.tag);
        if key.is_empty() {
            return Err(LiquidaError::SettingsInvalid(
                "discount entry with an empty tag".into(),
            ));
        }
        if entry.rate < Decimal::ZERO || entry.rate > Decimal::ONE {
            return Err(LiquidaError::SettingsInvalid(format!(
                "tag '{}' has discount {} outside [0, 1]",
                entry.tag, entry.rate
            )));
        }
        if !seen.insert(key) {
            return Err(LiquidaError::SettingsInvalid(format!(
                "tag '{}' is listed more than once",
                entry.tag
            )));
        }
    }
    Ok(())
}
