//! Commission engine: tier lookup, sale recording, date-range reporting and
//! the example-data bootstrap, all running against a [`SalesLedger`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commission::{CommissionQuote, TierTable};
use crate::domain::sale::{NewSale, Sale, SaleListing};
use crate::domain::salesperson::{NewSalesperson, Salesperson, SalespersonId};
use crate::domain::tier::{CommissionTier, NewCommissionTier};
use crate::errors::{EngineError, Field, LedgerError, ValidationError};
use crate::report::{DateRange, SalesReport};
use crate::seed::{SeedDataset, SeedOutcome};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCounts {
    pub salespeople: u64,
    pub tiers: u64,
    pub sales: u64,
}

/// Storage of salespeople, tiers and sales.
///
/// Every method is a single statement from the engine's point of view; the
/// engine never relies on multi-statement transactions.
#[async_trait]
pub trait SalesLedger: Send + Sync {
    async fn counts(&self) -> Result<LedgerCounts, LedgerError>;

    async fn insert_salesperson(
        &self,
        salesperson: NewSalesperson,
    ) -> Result<Salesperson, LedgerError>;

    async fn find_salesperson(
        &self,
        id: SalespersonId,
    ) -> Result<Option<Salesperson>, LedgerError>;

    /// Salespeople ordered by name.
    async fn list_salespeople(&self) -> Result<Vec<Salesperson>, LedgerError>;

    async fn insert_tier(&self, tier: NewCommissionTier) -> Result<CommissionTier, LedgerError>;

    /// Tiers in storage order.
    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, LedgerError>;

    async fn insert_sale(&self, sale: NewSale) -> Result<Sale, LedgerError>;

    /// Sales dated inside `range`, joined with salesperson and tier names.
    async fn sales_between(&self, range: &DateRange) -> Result<Vec<SaleListing>, LedgerError>;
}

/// Raw "add sale" input as received at the boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaleDraft {
    pub salesperson_id: Option<i64>,
    pub date: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidSale {
    pub salesperson_id: SalespersonId,
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl SaleDraft {
    pub fn validate(&self) -> Result<ValidSale, ValidationError> {
        let salesperson_id =
            self.salesperson_id.ok_or(ValidationError::MissingField(Field::SalespersonId))?;
        let date = present(self.date.as_deref()).ok_or(ValidationError::MissingField(Field::Date))?;
        let amount = self.amount.ok_or(ValidationError::MissingField(Field::Amount))?;

        let date = parse_date(Field::Date, date)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }

        Ok(ValidSale { salesperson_id: SalespersonId(salesperson_id), date, amount })
    }
}

/// Raw date-range filter as received at the boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReportQuery {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: Some(start.into()), end: Some(end.into()) }
    }

    pub fn validate(&self) -> Result<DateRange, ValidationError> {
        let (Some(start), Some(end)) = (present(self.start.as_deref()), present(self.end.as_deref()))
        else {
            return Err(ValidationError::MissingDateRange);
        };

        Ok(DateRange::new(parse_date(Field::StartDate, start)?, parse_date(Field::EndDate, end)?))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn parse_date(field: Field, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate { field, value: value.to_string() })
}

#[derive(Clone)]
pub struct CommissionEngine {
    ledger: Arc<dyn SalesLedger>,
}

impl CommissionEngine {
    pub fn new(ledger: Arc<dyn SalesLedger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<dyn SalesLedger> {
        &self.ledger
    }

    /// Loads and validates the current tier table.
    pub async fn tier_table(&self) -> Result<TierTable, EngineError> {
        let tiers = self.ledger.list_tiers().await?;
        Ok(TierTable::new(tiers)?)
    }

    pub async fn compute_commission(&self, amount: Decimal) -> Result<CommissionQuote, EngineError> {
        Ok(self.tier_table().await?.compute(amount))
    }

    pub async fn record_sale(&self, draft: SaleDraft) -> Result<Sale, EngineError> {
        let valid = draft.validate()?;

        if self.ledger.find_salesperson(valid.salesperson_id).await?.is_none() {
            return Err(ValidationError::UnknownSalesperson(valid.salesperson_id.to_string()).into());
        }

        let quote = self.compute_commission(valid.amount).await?;
        let sale = self
            .ledger
            .insert_sale(NewSale {
                salesperson_id: valid.salesperson_id,
                date: valid.date,
                amount: valid.amount,
                commission: quote.commission,
                tier_id: quote.tier_id(),
            })
            .await?;

        info!(
            event_name = "commission.sale.recorded",
            sale_id = sale.id.0,
            salesperson_id = sale.salesperson_id.0,
            amount = %sale.amount,
            commission = %sale.commission,
            tier = quote.tier_name().unwrap_or("none"),
            "sale recorded"
        );

        Ok(sale)
    }

    pub async fn filter_sales(&self, query: &ReportQuery) -> Result<SalesReport, EngineError> {
        let range = query.validate()?;
        let listings = self.ledger.sales_between(&range).await?;
        let report = SalesReport::from_listings(listings);

        info!(
            event_name = "commission.report.built",
            start = %range.start,
            end = %range.end,
            count = report.totals.count,
            "sales report built"
        );

        Ok(report)
    }

    pub async fn list_salespeople(&self) -> Result<Vec<Salesperson>, EngineError> {
        Ok(self.ledger.list_salespeople().await?)
    }

    /// Loads `dataset` unless salespeople already exist. Dataset tiers are
    /// only inserted into an empty tier table; preconfigured tiers are kept.
    /// Sales are priced against the stored table, which must validate before
    /// any salesperson is written.
    pub async fn bootstrap(&self, dataset: &SeedDataset) -> Result<SeedOutcome, EngineError> {
        let counts = self.ledger.counts().await?;
        if counts.salespeople > 0 {
            info!(
                event_name = "commission.seed.skipped",
                existing_salespeople = counts.salespeople,
                "example data already present"
            );
            return Ok(SeedOutcome::Skipped { existing_salespeople: counts.salespeople });
        }

        let mut inserted_tiers = 0;
        if counts.tiers == 0 {
            for tier in &dataset.tiers {
                self.ledger.insert_tier(tier.clone()).await?;
                inserted_tiers += 1;
            }
        } else {
            info!(
                event_name = "commission.seed.tiers_kept",
                existing_tiers = counts.tiers,
                "commission tiers already configured; dataset tiers not inserted"
            );
        }
        let table = self.tier_table().await?;

        let mut salespeople = Vec::with_capacity(dataset.salespeople.len());
        for salesperson in &dataset.salespeople {
            salespeople.push(self.ledger.insert_salesperson(salesperson.clone()).await?);
        }

        for seed in &dataset.sales {
            let owner = salespeople
                .iter()
                .find(|person| person.email == seed.salesperson_email)
                .ok_or_else(|| ValidationError::UnknownSalesperson(seed.salesperson_email.clone()))?;
            let date = parse_date(Field::Date, &seed.date)?;
            let quote = table.compute(seed.amount);

            self.ledger
                .insert_sale(NewSale {
                    salesperson_id: owner.id,
                    date,
                    amount: seed.amount,
                    commission: quote.commission,
                    tier_id: quote.tier_id(),
                })
                .await?;
        }

        let outcome = SeedOutcome::Loaded {
            salespeople: salespeople.len(),
            tiers: inserted_tiers,
            sales: dataset.sales.len(),
        };
        info!(event_name = "commission.seed.loaded", summary = %outcome.summary(), "example data loaded");

        Ok(outcome)
    }
}
