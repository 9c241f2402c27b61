use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::Zone;
use crate::parsing::normalize::normalize_name;

/// Monthly goal and progressive commission table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionPlan {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Base monthly collection goal, before proration.
    pub monthly_goal: Decimal,
    /// Bands ordered by `min_excess`, covering `[0, ∞)`.
    pub tiers: Vec<CommissionTier>,
}

/// One band of the commission table: `rate` applies to the slice of
/// excess within `[min_excess, max_excess)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionTier {
    pub label: String,
    pub min_excess: Decimal,
    /// `None` for the open-ended last band.
    pub max_excess: Option<Decimal>,
    pub rate: Decimal,
}

/// Keyword table for zone classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Checked in order; the first zone with a matching keyword wins.
    pub zones: Vec<ZoneKeywords>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneKeywords {
    pub zone: Zone,
    pub keywords: Vec<String>,
}

/// Discount withheld from a task's gross value, by classification tag
/// (tipología).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountTable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub rates: Vec<TagDiscount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDiscount {
    pub tag: String,
    /// Fraction of the gross value withheld, in `[0, 1]`.
    pub rate: Decimal,
}

impl DiscountTable {
    /// Rate for `tag`, matched case-insensitively on the trimmed text.
    /// Unknown and empty tags carry no discount.
    pub fn rate_for(&self, tag: &str) -> Decimal {
        let key = normalize_name(tag);
        if key.is_empty() {
            return Decimal::ZERO;
        }
        self.rates
            .iter()
            .find(|r| normalize_name(&r.tag) == key)
            .map_or(Decimal::ZERO, |r| r.rate)
    }
}

/// All configuration the engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub commission: CommissionPlan,
    pub zones: ZoneTable,
    pub discounts: DiscountTable,
}
