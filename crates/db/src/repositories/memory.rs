use async_trait::async_trait;
use tokio::sync::RwLock;

use commission_core::domain::sale::{NewSale, Sale, SaleId, SaleListing};
use commission_core::domain::salesperson::{NewSalesperson, Salesperson, SalespersonId};
use commission_core::domain::tier::{CommissionTier, NewCommissionTier, TierId};
use commission_core::engine::{LedgerCounts, SalesLedger};
use commission_core::errors::LedgerError;
use commission_core::report::DateRange;

#[derive(Default)]
struct LedgerRows {
    salespeople: Vec<Salesperson>,
    tiers: Vec<CommissionTier>,
    sales: Vec<Sale>,
}

/// Ledger held in process memory. Enforces the same unique-email and
/// salesperson-reference rules as the SQL schema.
#[derive(Default)]
pub struct InMemorySalesLedger {
    rows: RwLock<LedgerRows>,
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |len| len + 1)
}

#[async_trait]
impl SalesLedger for InMemorySalesLedger {
    async fn counts(&self) -> Result<LedgerCounts, LedgerError> {
        let rows = self.rows.read().await;
        Ok(LedgerCounts {
            salespeople: rows.salespeople.len() as u64,
            tiers: rows.tiers.len() as u64,
            sales: rows.sales.len() as u64,
        })
    }

    async fn insert_salesperson(
        &self,
        salesperson: NewSalesperson,
    ) -> Result<Salesperson, LedgerError> {
        let mut rows = self.rows.write().await;
        if rows.salespeople.iter().any(|existing| existing.email == salesperson.email) {
            return Err(LedgerError::Storage(format!(
                "salesperson email `{}` already exists",
                salesperson.email
            )));
        }

        let stored = Salesperson {
            id: SalespersonId(next_id(rows.salespeople.len())),
            name: salesperson.name,
            email: salesperson.email,
        };
        rows.salespeople.push(stored.clone());
        Ok(stored)
    }

    async fn find_salesperson(
        &self,
        id: SalespersonId,
    ) -> Result<Option<Salesperson>, LedgerError> {
        let rows = self.rows.read().await;
        Ok(rows.salespeople.iter().find(|person| person.id == id).cloned())
    }

    async fn list_salespeople(&self) -> Result<Vec<Salesperson>, LedgerError> {
        let rows = self.rows.read().await;
        let mut salespeople = rows.salespeople.clone();
        salespeople.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(salespeople)
    }

    async fn insert_tier(&self, tier: NewCommissionTier) -> Result<CommissionTier, LedgerError> {
        let mut rows = self.rows.write().await;
        let stored = CommissionTier {
            id: TierId(next_id(rows.tiers.len())),
            name: tier.name,
            lower_bound: tier.lower_bound,
            upper_bound: tier.upper_bound,
            rate: tier.rate,
        };
        rows.tiers.push(stored.clone());
        Ok(stored)
    }

    async fn list_tiers(&self) -> Result<Vec<CommissionTier>, LedgerError> {
        Ok(self.rows.read().await.tiers.clone())
    }

    async fn insert_sale(&self, sale: NewSale) -> Result<Sale, LedgerError> {
        let mut rows = self.rows.write().await;
        if !rows.salespeople.iter().any(|person| person.id == sale.salesperson_id) {
            return Err(LedgerError::Storage(format!(
                "salesperson `{}` referenced by sale does not exist",
                sale.salesperson_id
            )));
        }

        let stored = Sale {
            id: SaleId(next_id(rows.sales.len())),
            salesperson_id: sale.salesperson_id,
            date: sale.date,
            amount: sale.amount,
            commission: sale.commission,
            tier_id: sale.tier_id,
        };
        rows.sales.push(stored.clone());
        Ok(stored)
    }

    async fn sales_between(&self, range: &DateRange) -> Result<Vec<SaleListing>, LedgerError> {
        let rows = self.rows.read().await;
        let mut listings = rows
            .sales
            .iter()
            .filter(|sale| range.contains(sale.date))
            .filter_map(|sale| {
                let owner = rows.salespeople.iter().find(|person| person.id == sale.salesperson_id)?;
                let tier_name = sale
                    .tier_id
                    .and_then(|id| rows.tiers.iter().find(|tier| tier.id == id))
                    .map(|tier| tier.name.clone());
                Some(SaleListing {
                    sale: sale.clone(),
                    salesperson_name: owner.name.clone(),
                    tier_name,
                })
            })
            .collect::<Vec<_>>();
        listings.sort_by(|left, right| {
            right.sale.date.cmp(&left.sale.date).then(right.sale.id.cmp(&left.sale.id))
        });
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use commission_core::domain::sale::NewSale;
    use commission_core::domain::salesperson::{NewSalesperson, SalespersonId};
    use commission_core::engine::SalesLedger;
    use commission_core::errors::LedgerError;
    use commission_core::report::DateRange;

    use crate::repositories::InMemorySalesLedger;

    #[tokio::test]
    async fn in_memory_ledger_rejects_duplicate_email() {
        let ledger = InMemorySalesLedger::default();
        ledger
            .insert_salesperson(NewSalesperson::new("Juan Pérez", "juan@empresa.com"))
            .await
            .expect("first insert");

        let duplicate =
            ledger.insert_salesperson(NewSalesperson::new("Juan P.", "juan@empresa.com")).await;

        assert!(matches!(duplicate, Err(LedgerError::Storage(_))));
    }

    #[tokio::test]
    async fn in_memory_ledger_rejects_orphan_sale() {
        let ledger = InMemorySalesLedger::default();

        let result = ledger
            .insert_sale(NewSale {
                salesperson_id: SalespersonId(9),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
                amount: Decimal::from(10),
                commission: Decimal::ZERO,
                tier_id: None,
            })
            .await;

        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }

    #[tokio::test]
    async fn in_memory_ledger_filters_by_range() {
        let ledger = InMemorySalesLedger::default();
        let owner = ledger
            .insert_salesperson(NewSalesperson::new("Ana", "ana@empresa.com"))
            .await
            .expect("insert");

        for day in [10, 20] {
            ledger
                .insert_sale(NewSale {
                    salesperson_id: owner.id,
                    date: NaiveDate::from_ymd_opt(2024, 1, day).expect("date"),
                    amount: Decimal::from(10),
                    commission: Decimal::ZERO,
                    tier_id: None,
                })
                .await
                .expect("insert sale");
        }

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
            NaiveDate::from_ymd_opt(2024, 1, 31).expect("date"),
        );
        let listings = ledger.sales_between(&range).await.expect("listings");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].salesperson_name, "Ana");
    }
}
