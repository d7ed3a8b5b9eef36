use async_trait::async_trait;
use salesboard_core::{BandCount, CategoryCount, Page, RecordFilter, StoredTransaction, Transaction};

use crate::Result;

/// Persistence for transaction records.
///
/// Records are append-only: nothing here updates or deletes, and inserting
/// the same record twice stores it twice.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append records, returning how many were stored.
    async fn insert_many(&self, records: &[Transaction]) -> Result<u64>;

    /// Matching records in insertion order, optionally paginated.
    async fn find(&self, filter: &RecordFilter, page: Option<Page>) -> Result<Vec<StoredTransaction>>;

    async fn count(&self, filter: &RecordFilter) -> Result<u64>;

    /// Sum of `price` over matching records; 0 when nothing matches.
    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64>;

    /// Non-empty price bands, ascending.
    async fn count_by_price_band(&self, filter: &RecordFilter) -> Result<Vec<BandCount>>;

    /// Non-empty categories, ordered by name.
    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>>;
}
