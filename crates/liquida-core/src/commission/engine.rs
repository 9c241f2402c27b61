use rust_decimal::Decimal;

use super::outcome::CommissionOutcome;
use crate::parsing::values::round_currency;
use crate::settings::schema::CommissionTier;

/// Progressive commission over the excess above `goal`.
///
/// Each tier's rate applies only to the slice of excess inside its band
/// `[min_excess, max_excess)`. The sum is rounded once, at the end.
/// The reported tier is the last one that contributed; when the goal is
/// met exactly it is the first tier.
pub fn compute_commission(
    net_total: Decimal,
    goal: Decimal,
    tiers: &[CommissionTier],
) -> CommissionOutcome {
    if net_total < goal {
        return CommissionOutcome::none();
    }

    let excess = net_total - goal;
    let mut commission = Decimal::ZERO;
    let mut reached: Option<&CommissionTier> = None;

    for tier in tiers.iter().filter(|t| t.min_excess <= excess) {
        let top = match tier.max_excess {
            Some(max) => max.min(excess),
            None => excess,
        };
        let slice = (top - tier.min_excess).max(Decimal::ZERO);
        if slice > Decimal::ZERO {
            commission += slice * tier.rate;
            reached = Some(tier);
        }
    }

    CommissionOutcome {
        commission: round_currency(commission),
        tier: reached.or_else(|| tiers.first()).cloned(),
        excess,
        goal_met: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::builtin::default_commission_plan;
    use rust_decimal_macros::dec;

    fn tiers() -> Vec<CommissionTier> {
        default_commission_plan().unwrap().tiers
    }

    #[test]
    fn test_progressive_two_bands() {
        let out = compute_commission(dec!(5800000), dec!(4500000), &tiers());
        assert!(out.goal_met);
        assert_eq!(out.excess, dec!(1300000));
        assert_eq!(out.commission, dec!(174000));
        assert_eq!(out.tier_label(), "2");
    }

    #[test]
    fn test_goal_not_met() {
        let out = compute_commission(dec!(4000000), dec!(4500000), &tiers());
        assert!(!out.goal_met);
        assert_eq!(out.commission, Decimal::ZERO);
        assert_eq!(out.excess, Decimal::ZERO);
        assert_eq!(out.tier_label(), "Ninguno");
    }

    #[test]
    fn test_goal_met_exactly() {
        let out = compute_commission(dec!(4500000), dec!(4500000), &tiers());
        assert!(out.goal_met);
        assert_eq!(out.commission, Decimal::ZERO);
        assert_eq!(out.tier_label(), "1");
    }

    #[test]
    fn test_band_boundary_stays_in_lower_tier() {
        let out = compute_commission(dec!(5500000), dec!(4500000), &tiers());
        assert_eq!(out.commission, dec!(150000));
        assert_eq!(out.tier_label(), "1");
    }

    #[test]
    fn test_open_ended_top_tier() {
        // 150k + 80k + 50k + 2M * 3%
        let out = compute_commission(dec!(9500000), dec!(4500000), &tiers());
        assert_eq!(out.commission, dec!(340000));
        assert_eq!(out.tier_label(), "4");
    }

    #[test]
    fn test_rounds_once_at_end() {
        let t = vec![
            CommissionTier {
                label: "a".into(),
                min_excess: dec!(0),
                max_excess: Some(dec!(3)),
                rate: dec!(0.15),
            },
            CommissionTier {
                label: "b".into(),
                min_excess: dec!(3),
                max_excess: None,
                rate: dec!(0.15),
            },
        ];
        // 0.45 + 0.15 = 0.6, per-tier rounding would give 0 + 0
        let out = compute_commission(dec!(104), dec!(100), &t);
        assert_eq!(out.commission, dec!(1));
    }

    #[test]
    fn test_every_excess_has_a_path() {
        let t = tiers();
        let mut net = dec!(4500000);
        while net <= dec!(9000000) {
            let out = compute_commission(net, dec!(4500000), &t);
            assert!(out.goal_met);
            assert!(out.tier.is_some());
            assert!(out.commission >= Decimal::ZERO);
            net += dec!(137500);
        }
    }
}
