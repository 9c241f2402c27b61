use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::parsing::values::round_currency;

/// Days in the month the base goal is defined against.
pub const REFERENCE_MONTH_DAYS: u32 = 30;

/// Goal for a month in which the technician worked `worked_days`.
///
/// Unknown or zero attendance leaves the base goal untouched.
pub fn effective_goal(base_goal: Decimal, worked_days: Option<u32>) -> Decimal {
    match worked_days {
        Some(days) if days > 0 => {
            let reference = Decimal::from(REFERENCE_MONTH_DAYS);
            let missing = reference - Decimal::from(days);
            round_currency(base_goal - (base_goal / reference) * missing)
        }
        _ => base_goal,
    }
}

/// `net_total / goal * 100` to one decimal place.
pub fn percentage_of_goal(net_total: Decimal, goal: Decimal) -> Decimal {
    if goal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (net_total / goal * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    GoalMet,
    NearGoal,
    InProgress,
}

impl GoalStatus {
    pub fn from_percentage(pct: Decimal) -> Self {
        if pct >= Decimal::ONE_HUNDRED {
            GoalStatus::GoalMet
        } else if pct >= Decimal::from(80) {
            GoalStatus::NearGoal
        } else {
            GoalStatus::InProgress
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::GoalMet => write!(f, "Meta cumplida"),
            GoalStatus::NearGoal => write!(f, "Cerca de la meta"),
            GoalStatus::InProgress => write!(f, "En progreso"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_prorated_half_month() {
        assert_eq!(effective_goal(dec!(4500000), Some(15)), dec!(2250000));
    }

    #[test]
    fn test_unknown_days_keeps_base() {
        assert_eq!(effective_goal(dec!(4500000), None), dec!(4500000));
        assert_eq!(effective_goal(dec!(4500000), Some(0)), dec!(4500000));
    }

    #[test]
    fn test_proration_rounds_to_unit() {
        // 1000 - 1000/30 * 1 = 966.66..
        assert_eq!(effective_goal(dec!(1000), Some(29)), dec!(967));
    }

    #[test]
    fn test_full_month() {
        assert_eq!(effective_goal(dec!(4500000), Some(30)), dec!(4500000));
    }

    #[test]
    fn test_percentage_one_decimal() {
        assert_eq!(percentage_of_goal(dec!(5800000), dec!(4500000)), dec!(128.9));
        assert_eq!(percentage_of_goal(dec!(1), dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_goal_status_bands() {
        assert_eq!(GoalStatus::from_percentage(dec!(100)), GoalStatus::GoalMet);
        assert_eq!(GoalStatus::from_percentage(dec!(80)), GoalStatus::NearGoal);
        assert_eq!(GoalStatus::from_percentage(dec!(79.9)), GoalStatus::InProgress);
    }
}
