pub mod import;
pub mod reports;
pub mod transactions;
