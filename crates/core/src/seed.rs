use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::salesperson::NewSalesperson;
use crate::domain::tier::NewCommissionTier;

const EXAMPLE_SALESPEOPLE: &[(&str, &str)] = &[
    ("Juan Pérez", "juan@empresa.com"),
    ("María García", "maria@empresa.com"),
    ("Carlos López", "carlos@empresa.com"),
];

/// (name, lower bound, upper bound, rate in percent)
const EXAMPLE_TIERS: &[(&str, i64, i64, i64)] = &[
    ("Básica", 0, 1_000, 5),
    ("Intermedia", 1_001, 5_000, 8),
    ("Avanzada", 5_001, 10_000, 12),
    ("Premium", 10_001, 15_000, 15),
    ("Premium Plus", 15_001, 9_999_999, 18),
];

/// (salesperson email, date, amount)
const EXAMPLE_SALES: &[(&str, &str, i64)] = &[
    ("juan@empresa.com", "2024-01-15", 2_500),
    ("maria@empresa.com", "2024-01-20", 8_000),
    ("juan@empresa.com", "2024-02-05", 1_200),
    ("carlos@empresa.com", "2024-02-12", 18_000),
    ("maria@empresa.com", "2024-02-18", 3_500),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedSale {
    pub salesperson_email: String,
    pub date: String,
    pub amount: Decimal,
}

/// Reference data plus example sales loaded by the bootstrap procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedDataset {
    pub salespeople: Vec<NewSalesperson>,
    pub tiers: Vec<NewCommissionTier>,
    pub sales: Vec<SeedSale>,
}

impl SeedDataset {
    pub fn example() -> Self {
        Self {
            salespeople: EXAMPLE_SALESPEOPLE
                .iter()
                .map(|(name, email)| NewSalesperson::new(*name, *email))
                .collect(),
            tiers: EXAMPLE_TIERS
                .iter()
                .map(|(name, lower, upper, rate_pct)| NewCommissionTier {
                    name: (*name).to_string(),
                    lower_bound: Decimal::from(*lower),
                    upper_bound: Decimal::from(*upper),
                    rate: Decimal::new(*rate_pct, 2),
                })
                .collect(),
            sales: EXAMPLE_SALES
                .iter()
                .map(|(email, date, amount)| SeedSale {
                    salesperson_email: (*email).to_string(),
                    date: (*date).to_string(),
                    amount: Decimal::from(*amount),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Skipped { existing_salespeople: u64 },
    Loaded { salespeople: usize, tiers: usize, sales: usize },
}

impl SeedOutcome {
    pub fn was_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Skipped { existing_salespeople } => format!(
                "example data already present ({existing_salespeople} salespeople); nothing loaded"
            ),
            Self::Loaded { salespeople, tiers, sales } => format!(
                "loaded {salespeople} salespeople, {tiers} commission tiers and {sales} sales"
            ),
        }
    }
}
