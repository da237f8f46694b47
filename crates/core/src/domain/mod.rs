pub mod sale;
pub mod salesperson;
pub mod tier;
