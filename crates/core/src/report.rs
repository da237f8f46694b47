use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::sale::{SaleId, SaleListing};

/// Tier label shown for sales that matched no commission tier.
pub const NO_TIER_LABEL: &str = "N/A";

/// Inclusive calendar range. A start after the end is legal and selects
/// nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    pub id: SaleId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub commission: Decimal,
    pub salesperson_name: String,
    pub tier_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub count: u64,
    pub total_amount: Decimal,
    pub total_commission: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub lines: Vec<ReportLine>,
    pub totals: SalesTotals,
}

impl SalesReport {
    /// Builds the report newest-first, ties broken by the higher sale id.
    pub fn from_listings(listings: Vec<SaleListing>) -> Self {
        let mut lines = listings.into_iter().map(ReportLine::from).collect::<Vec<_>>();
        lines.sort_by(|left, right| right.date.cmp(&left.date).then_with(|| right.id.cmp(&left.id)));

        let totals = lines.iter().fold(SalesTotals::default(), |mut totals, line| {
            totals.count += 1;
            totals.total_amount += line.amount;
            totals.total_commission += line.commission;
            totals
        });

        Self { lines, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<SaleListing> for ReportLine {
    fn from(listing: SaleListing) -> Self {
        Self {
            id: listing.sale.id,
            date: listing.sale.date,
            amount: listing.sale.amount,
            commission: listing.sale.commission,
            salesperson_name: listing.salesperson_name,
            tier_name: listing.tier_name.unwrap_or_else(|| NO_TIER_LABEL.to_string()),
        }
    }
}
