use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::settings::schema::CommissionTier;

/// Label shown when no tier applies.
pub const NO_TIER_LABEL: &str = "Ninguno";

/// Result of evaluating one net total against a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionOutcome {
    /// Commission in whole currency units.
    pub commission: Decimal,
    /// Highest tier reached. `None` when the goal was not met.
    pub tier: Option<CommissionTier>,
    /// Net total above the goal, zero when the goal was not met.
    pub excess: Decimal,
    pub goal_met: bool,
}

impl CommissionOutcome {
    pub fn none() -> Self {
        CommissionOutcome {
            commission: Decimal::ZERO,
            tier: None,
            excess: Decimal::ZERO,
            goal_met: false,
        }
    }

    pub fn tier_label(&self) -> &str {
        self.tier.as_ref().map_or(NO_TIER_LABEL, |t| t.label.as_str())
    }
}
