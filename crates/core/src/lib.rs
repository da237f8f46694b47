pub mod commission;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod report;
pub mod seed;

pub use commission::{AppliedTier, CommissionQuote, TierTable, TierTableError};
pub use domain::sale::{NewSale, Sale, SaleId, SaleListing};
pub use domain::salesperson::{NewSalesperson, Salesperson, SalespersonId};
pub use domain::tier::{CommissionTier, NewCommissionTier, TierId};
pub use engine::{CommissionEngine, LedgerCounts, ReportQuery, SaleDraft, SalesLedger};
pub use errors::{EngineError, Field, InterfaceError, LedgerError, ValidationError};
pub use report::{DateRange, ReportLine, SalesReport, SalesTotals, NO_TIER_LABEL};
pub use seed::{SeedDataset, SeedOutcome};
