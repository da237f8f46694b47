use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use commission_core::domain::sale::{NewSale, Sale, SaleId, SaleListing};
use commission_core::domain::salesperson::{NewSalesperson, Salesperson, SalespersonId};
use commission_core::domain::tier::{CommissionTier, NewCommissionTier, TierId};
use commission_core::engine::{LedgerCounts, SalesLedger, DATE_FORMAT};
use commission_core::errors::LedgerError;
use commission_core::report::DateRange;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::RepositoryError;
use crate::DbPool;

/// SQLite-backed ledger. Each method runs one statement on a pooled
/// connection.
#[derive(Clone)]
pub struct SqlSalesLedger {
    pool: DbPool,
}

impl SqlSalesLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn insert_salesperson_row(
        &self,
        salesperson: NewSalesperson,
    ) -> Result<Salesperson, RepositoryError> {
        let result = sqlx::query("INSERT INTO salesperson (name, email) VALUES (?1, ?2)")
            .bind(&salesperson.name)
            .bind(&salesperson.email)
            .execute(&self.pool)
            .await?;

        Ok(Salesperson {
            id: SalespersonId(result.last_insert_rowid()),
            name: salesperson.name,
            email: salesperson.email,
        })
    }

    async fn insert_tier_row(
        &self,
        tier: NewCommissionTier,
    ) -> Result<CommissionTier, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO commission_tier (name, lower_bound, upper_bound, rate)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&tier.name)
        .bind(tier.lower_bound.to_string())
        .bind(tier.upper_bound.to_string())
        .bind(tier.rate.to_string())
        .execute(&self.pool)
        .await?;

        Ok(CommissionTier {
            id: TierId(result.last_insert_rowid()),
            name: tier.name,
            lower_bound: tier.lower_bound,
            upper_bound: tier.upper_bound,
            rate: tier.rate,
        })
    }

    async fn insert_sale_row(&self, sale: NewSale) -> Result<Sale, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO sale (salesperson_id, sale_date, amount, commission, tier_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(sale.salesperson_id.0)
        .bind(sale.date.format(DATE_FORMAT).to_string())
        .bind(sale.amount.to_string())
        .bind(sale.commission.to_string())
        .bind(sale.tier_id.map(|id| id.0))
        .execute(&self.pool)
        .await?;

        Ok(Sale {
            id: SaleId(result.last_insert_rowid()),
            salesperson_id: sale.salesperson_id,
            date: sale.date,
            amount: sale.amount,
            commission: sale.commission,
            tier_id: sale.tier_id,
        })
    }

    async fn fetch_counts(&self) -> Result<LedgerCounts, RepositoryError> {
        let (salespeople, tiers, sales): (i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM salesperson),
                (SELECT COUNT(*) FROM commission_tier),
                (SELECT COUNT(*) FROM sale)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(LedgerCounts {
            salespeople: decode_count("salesperson", salespeople)?,
            tiers: decode_count("commission_tier", tiers)?,
            sales: decode_count("sale", sales)?,
        })
    }

    async fn fetch_salesperson(
        &self,
        id: SalespersonId,
    ) -> Result<Option<Salesperson>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, email FROM salesperson WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(salesperson_from_row).transpose()
    }

    async fn fetch_salespeople(&self) -> Result<Vec<Salesperson>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, email FROM salesperson ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(salesperson_from_row).collect()
    }

    async fn fetch_tiers(&self) -> Result<Vec<CommissionTier>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, lower_bound, upper_bound, rate FROM commission_tier ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tier_from_row).collect()
    }

    async fn fetch_sales_between(
        &self,
        range: &DateRange,
    ) -> Result<Vec<SaleListing>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                s.id,
                s.salesperson_id,
                s.sale_date,
                s.amount,
                s.commission,
                s.tier_id,
                p.name AS salesperson_name,
                t.name AS tier_name
             FROM sale s
             JOIN salesperson p ON p.id = s.salesperson_id
             LEFT JOIN commission_tier t ON t.id = s.tier_id
             WHERE s.sale_date BETWEEN ?1 AND ?2
             ORDER BY s.sale_date DESC, s.id DESC",
        )
        .bind(range.start.format(DATE_FORMAT).to_string())
        .bind(range.end.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(listing_from_row).collect()
    }
}

#[async_trait]
impl SalesLedger for SqlSalesLedger {
    async fn counts(&self) -> Result<LedgerCounts, LedgerError> {
        Ok(self.fetch_counts().await?)
    }

    async fn insert_salesperson(
        &self,
        salesperson: NewSalesperson,
    ) -> Result<Salesperson, LedgerError> {
        Ok(self.insert_salesperson_row(salesperson).await?)
    }

    async fn find_salesperson(
        &self,
        id: SalespersonId,
    ) -> Result<Option<Salesperson>, LedgerError> {
        Ok(self.fetch_salesperson(id).await?)
    }

    async fn list_salespeople(&self) -> Result<Vec<Salesperson>, LedgerError> {
        Ok(self.fetch_salespeople().await?)
    }

    async fn insert_tier(&self, tier: NewCommissionTier) -> Result<CommissionTier, LedgerError> {
        Ok(self.insert_tier_row(tier).await?)
    }

    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, LedgerError> {
        Ok(self.fetch_tiers().await?)
    }

    async fn insert_sale(&self, sale: NewSale) -> Result<Sale, LedgerError> {
        Ok(self.insert_sale_row(sale).await?)
    }

    async fn sales_between(&self, range: &DateRange) -> Result<Vec<SaleListing>, LedgerError> {
        Ok(self.fetch_sales_between(range).await?)
    }
}

fn salesperson_from_row(row: &SqliteRow) -> Result<Salesperson, RepositoryError> {
    Ok(Salesperson {
        id: SalespersonId(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

fn tier_from_row(row: &SqliteRow) -> Result<CommissionTier, RepositoryError> {
    let lower_bound: String = row.try_get("lower_bound")?;
    let upper_bound: String = row.try_get("upper_bound")?;
    let rate: String = row.try_get("rate")?;

    Ok(CommissionTier {
        id: TierId(row.try_get("id")?),
        name: row.try_get("name")?,
        lower_bound: decode_decimal("commission_tier.lower_bound", &lower_bound)?,
        upper_bound: decode_decimal("commission_tier.upper_bound", &upper_bound)?,
        rate: decode_decimal("commission_tier.rate", &rate)?,
    })
}

fn listing_from_row(row: &SqliteRow) -> Result<SaleListing, RepositoryError> {
    let sale_date: String = row.try_get("sale_date")?;
    let amount: String = row.try_get("amount")?;
    let commission: String = row.try_get("commission")?;
    let tier_id: Option<i64> = row.try_get("tier_id")?;

    Ok(SaleListing {
        sale: Sale {
            id: SaleId(row.try_get("id")?),
            salesperson_id: SalespersonId(row.try_get("salesperson_id")?),
            date: decode_date("sale.sale_date", &sale_date)?,
            amount: decode_decimal("sale.amount", &amount)?,
            commission: decode_decimal("sale.commission", &commission)?,
            tier_id: tier_id.map(TierId),
        },
        salesperson_name: row.try_get("salesperson_name")?,
        tier_name: row.try_get("tier_name")?,
    })
}

fn decode_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value.trim())
        .map_err(|error| RepositoryError::Decode(format!("invalid decimal in {field}: {error}")))
}

fn decode_date(field: &str, value: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|error| RepositoryError::Decode(format!("invalid date in {field}: {error}")))
}

fn decode_count(table: &str, value: i64) -> Result<u64, RepositoryError> {
    u64::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("negative row count for {table}")))
}
