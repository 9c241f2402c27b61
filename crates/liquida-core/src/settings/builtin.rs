use crate::error::LiquidaError;
use crate::settings::schema::{CommissionPlan, DiscountTable, Settings, ZoneTable};
use crate::settings::{validate_commission_plan, validate_discount_table, validate_zone_table};

const COMMISSION_DEFAULT_JSON: &str = include_str!("../../../../presets/commission-default.json");
const ZONES_DEFAULT_JSON: &str = include_str!("../../../../presets/zones-default.json");
const DISCOUNTS_DEFAULT_JSON: &str = include_str!("../../../../presets/discounts-default.json");

/// The built-in commission plan: 4 500 000 goal, four descending-rate bands.
pub fn default_commission_plan() -> Result<CommissionPlan, LiquidaError> {
    let plan: CommissionPlan = serde_json::from_str(COMMISSION_DEFAULT_JSON)?;
    validate_commission_plan(&plan)?;
    Ok(plan)
}

/// The built-in six-zone keyword table.
pub fn default_zone_table() -> Result<ZoneTable, LiquidaError> {
    let table: ZoneTable = serde_json::from_str(ZONES_DEFAULT_JSON)?;
    validate_zone_table(&table)?;
    Ok(table)
}

/// The built-in tipología discounts: TIPO I to V, PRINCIPAL, INTERMEDIA, LEJANA.
pub fn default_discount_table() -> Result<DiscountTable, LiquidaError> {
    let table: DiscountTable = serde_json::from_str(DISCOUNTS_DEFAULT_JSON)?;
    validate_discount_table(&table)?;
    Ok(table)
}

pub fn load_default() -> Result<Settings, LiquidaError> {
    Ok(Settings {
        commission: default_commission_plan()?,
        zones: default_zone_table()?,
        discounts: default_discount_table()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Zone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_default_commission() {
        let plan = default_commission_plan().unwrap();
        assert_eq!(plan.monthly_goal, dec!(4500000));
        assert_eq!(plan.tiers.len(), 4);
        assert_eq!(plan.tiers[0].rate, dec!(0.15));
        assert!(plan.tiers[3].max_excess.is_none());
    }

    #[test]
    fn test_load_default_zones_in_priority_order() {
        let table = default_zone_table().unwrap();
        let order: Vec<Zone> = table.zones.iter().map(|z| z.zone).collect();
        assert_eq!(order, Zone::MACRO.to_vec());
    }

    #[test]
    fn test_load_default_discounts() {
        let table = default_discount_table().unwrap();
        assert_eq!(table.rates.len(), 8);
        assert_eq!(table.rate_for("TIPO II"), dec!(0.30));
        assert_eq!(table.rate_for(" tipo v "), dec!(0.60));
        assert_eq!(table.rate_for("LEJANA"), dec!(0.50));
        assert_eq!(table.rate_for("TIPO VI"), dec!(0));
        assert_eq!(table.rate_for(""), dec!(0));
    }
}
