pub mod table;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::tier::{CommissionTier, TierId};

pub use table::{TierTable, TierTableError};

/// Commissions are settled in cents.
pub const COMMISSION_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTier {
    pub id: TierId,
    pub name: String,
    pub rate: Decimal,
}

/// Outcome of evaluating one amount against the tier table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionQuote {
    pub amount: Decimal,
    pub commission: Decimal,
    pub tier: Option<AppliedTier>,
}

impl CommissionQuote {
    pub fn matched(amount: Decimal, tier: &CommissionTier) -> Self {
        Self {
            amount,
            commission: commission_for(amount, tier.rate),
            tier: Some(AppliedTier { id: tier.id, name: tier.name.clone(), rate: tier.rate }),
        }
    }

    pub fn unmatched(amount: Decimal) -> Self {
        Self { amount, commission: Decimal::ZERO, tier: None }
    }

    pub fn tier_id(&self) -> Option<TierId> {
        self.tier.as_ref().map(|tier| tier.id)
    }

    pub fn tier_name(&self) -> Option<&str> {
        self.tier.as_ref().map(|tier| tier.name.as_str())
    }
}

pub fn commission_for(amount: Decimal, rate: Decimal) -> Decimal {
    amount
        .saturating_mul(rate)
        .round_dp_with_strategy(COMMISSION_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
