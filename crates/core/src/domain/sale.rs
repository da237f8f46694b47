use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::salesperson::SalespersonId;
use crate::domain::tier::TierId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SaleId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub salesperson_id: SalespersonId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub commission: Decimal,
    pub tier_id: Option<TierId>,
}

/// A sale ready to be persisted, with its commission already computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub salesperson_id: SalespersonId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub commission: Decimal,
    pub tier_id: Option<TierId>,
}

/// A stored sale joined with the names a report needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleListing {
    pub sale: Sale,
    pub salesperson_name: String,
    pub tier_name: Option<String>,
}
