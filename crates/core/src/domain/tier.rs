use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TierId(pub i64);

/// A commission bracket. Both bounds are inclusive; `rate` is a fraction of
/// the sale amount (`0.08` pays eight percent).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionTier {
    pub id: TierId,
    pub name: String,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub rate: Decimal,
}

impl CommissionTier {
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.lower_bound && amount <= self.upper_bound
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommissionTier {
    pub name: String,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub rate: Decimal,
}
