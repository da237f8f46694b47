use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::tier::CommissionTier;

use super::CommissionQuote;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TierTableError {
    #[error("tier `{tier}` has lower bound {lower} above upper bound {upper}")]
    InvertedRange { tier: String, lower: Decimal, upper: Decimal },
    #[error("tier `{tier}` has negative rate {rate}")]
    NegativeRate { tier: String, rate: Decimal },
    #[error("tiers `{first}` and `{second}` overlap")]
    Overlap { first: String, second: String },
}

/// Commission tiers sorted by lower bound, validated to be non-overlapping.
///
/// Gaps between tiers are allowed; an amount that falls in a gap earns no
/// commission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierTable {
    tiers: Vec<CommissionTier>,
}

impl TierTable {
    pub fn new(mut tiers: Vec<CommissionTier>) -> Result<Self, TierTableError> {
        for tier in &tiers {
            if tier.lower_bound > tier.upper_bound {
                return Err(TierTableError::InvertedRange {
                    tier: tier.name.clone(),
                    lower: tier.lower_bound,
                    upper: tier.upper_bound,
                });
            }
            if tier.rate < Decimal::ZERO {
                return Err(TierTableError::NegativeRate {
                    tier: tier.name.clone(),
                    rate: tier.rate,
                });
            }
        }

        tiers.sort_by(|left, right| {
            left.lower_bound.cmp(&right.lower_bound).then_with(|| left.id.cmp(&right.id))
        });

        for pair in tiers.windows(2) {
            if let [previous, next] = pair {
                if next.lower_bound <= previous.upper_bound {
                    return Err(TierTableError::Overlap {
                        first: previous.name.clone(),
                        second: next.name.clone(),
                    });
                }
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[CommissionTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn find(&self, amount: Decimal) -> Option<&CommissionTier> {
        let candidates = self.tiers.partition_point(|tier| tier.lower_bound <= amount);
        candidates
            .checked_sub(1)
            .and_then(|index| self.tiers.get(index))
            .filter(|tier| tier.contains(amount))
    }

    pub fn compute(&self, amount: Decimal) -> CommissionQuote {
        match self.find(amount) {
            Some(tier) => CommissionQuote::matched(amount, tier),
            None => CommissionQuote::unmatched(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{TierTable, TierTableError};
    use crate::domain::tier::{CommissionTier, TierId};

    fn tier(id: i64, name: &str, lower: i64, upper: i64, rate_pct: i64) -> CommissionTier {
        CommissionTier {
            id: TierId(id),
            name: name.to_string(),
            lower_bound: Decimal::from(lower),
            upper_bound: Decimal::from(upper),
            rate: Decimal::new(rate_pct, 2),
        }
    }

    fn three_tiers() -> Vec<CommissionTier> {
        vec![
            tier(1, "Básica", 0, 1000, 5),
            tier(2, "Intermedia", 1001, 5000, 8),
            tier(3, "Avanzada", 5001, 10000, 12),
        ]
    }

    #[test]
    fn sale_of_2500_lands_in_intermediate_tier() {
        let table = TierTable::new(three_tiers()).expect("valid table");
        let quote = table.compute(Decimal::from(2500));

        assert_eq!(quote.commission, Decimal::new(20000, 2));
        assert_eq!(quote.tier_name(), Some("Intermedia"));
        assert_eq!(quote.tier_id(), Some(TierId(2)));
    }

    #[test]
    fn sale_of_18000_uses_added_premium_plus_tier() {
        let mut tiers = three_tiers();
        tiers.push(tier(5, "Premium Plus", 15001, 9_999_999, 18));
        let table = TierTable::new(tiers).expect("valid table");

        let quote = table.compute(Decimal::from(18000));

        assert_eq!(quote.commission, Decimal::new(324_000, 2));
        assert_eq!(quote.tier_name(), Some("Premium Plus"));
    }

    #[test]
    fn every_amount_inside_a_tier_pays_that_tiers_rate() {
        let table = TierTable::new(three_tiers()).expect("valid table");

        for tier in table.tiers() {
            let midpoint = (tier.lower_bound + tier.upper_bound) / Decimal::from(2);
            for amount in [tier.lower_bound, midpoint, tier.upper_bound] {
                let quote = table.compute(amount);
                assert_eq!(quote.tier_id(), Some(tier.id), "amount {amount} in {}", tier.name);
                assert_eq!(quote.commission, (amount * tier.rate).round_dp(2));
            }
        }
    }

    #[test]
    fn amounts_outside_all_tiers_earn_nothing() {
        let table = TierTable::new(three_tiers()).expect("valid table");

        for amount in [Decimal::new(-1, 0), Decimal::new(1_000_001, 2), Decimal::from(10_001)] {
            let quote = table.compute(amount);
            assert_eq!(quote.commission, Decimal::ZERO);
            assert!(quote.tier.is_none(), "amount {amount} should not match a tier");
        }
    }

    #[test]
    fn amount_in_gap_between_tiers_earns_nothing() {
        let table = TierTable::new(three_tiers()).expect("valid table");
        let quote = table.compute(Decimal::new(100_050, 2));

        assert_eq!(quote.commission, Decimal::ZERO);
        assert_eq!(quote.tier_id(), None);
    }

    #[test]
    fn empty_table_never_matches() {
        let table = TierTable::default();
        assert!(table.is_empty());
        assert_eq!(table.compute(Decimal::from(500)).commission, Decimal::ZERO);
    }

    #[test]
    fn tiers_are_sorted_regardless_of_storage_order() {
        let mut tiers = three_tiers();
        tiers.reverse();
        let table = TierTable::new(tiers).expect("valid table");

        let names = table.tiers().iter().map(|tier| tier.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Básica", "Intermedia", "Avanzada"]);
    }

    #[test]
    fn overlapping_tiers_are_rejected() {
        let mut tiers = three_tiers();
        tiers.push(tier(4, "Solapada", 4000, 6000, 10));

        let error = TierTable::new(tiers).expect_err("overlap should fail");
        assert_eq!(
            error,
            TierTableError::Overlap {
                first: "Intermedia".to_string(),
                second: "Solapada".to_string(),
            }
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let error = TierTable::new(vec![tier(1, "Rota", 500, 100, 5)]).expect_err("inverted");
        assert!(matches!(error, TierTableError::InvertedRange { .. }));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let error = TierTable::new(vec![tier(1, "Negativa", 0, 100, -5)]).expect_err("negative");
        assert!(matches!(error, TierTableError::NegativeRate { .. }));
    }
}
