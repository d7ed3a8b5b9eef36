pub mod error;
pub mod month;
pub mod query;
pub mod record;
pub mod report;

// Re-exports
pub use error::{Error, Result};
pub use month::{DateMatching, MonthConstraint, MonthWindow, YearPolicy, DEFAULT_REFERENCE_YEAR};
pub use query::{ListingParams, ListingQuery, MonthParams, Page, RecordFilter, SearchTerm};
pub use record::{StoredTransaction, Transaction};
pub use report::{BandCount, CategoryCount, PriceBand, SalesSummary};
