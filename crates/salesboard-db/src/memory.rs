use async_trait::async_trait;
use salesboard_core::{
    BandCount, CategoryCount, Page, PriceBand, RecordFilter, StoredTransaction, Transaction,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{RecordStore, Result};

/// In-process record store, used by tests and `STORE=memory` runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<StoredTransaction>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_many(&self, records: &[Transaction]) -> Result<u64> {
        let mut stored = self.records.write().await;
        let first_key = stored.len() as i64 + 1;

        stored.extend(
            records
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, record)| StoredTransaction::new(first_key + i as i64, record)),
        );

        tracing::debug!("Inserted {} records into memory store", records.len());

        Ok(records.len() as u64)
    }

    async fn find(&self, filter: &RecordFilter, page: Option<Page>) -> Result<Vec<StoredTransaction>> {
        let stored = self.records.read().await;
        let matching = stored.iter().filter(|s| filter.matches(&s.record));

        let found = match page {
            Some(page) => matching
                .skip(page.skip as usize)
                .take(page.limit as usize)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(found)
    }

    async fn count(&self, filter: &RecordFilter) -> Result<u64> {
        let stored = self.records.read().await;
        Ok(stored.iter().filter(|s| filter.matches(&s.record)).count() as u64)
    }

    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64> {
        let stored = self.records.read().await;
        Ok(stored
            .iter()
            .filter(|s| filter.matches(&s.record))
            .map(|s| s.record.price)
            .sum())
    }

    async fn count_by_price_band(&self, filter: &RecordFilter) -> Result<Vec<BandCount>> {
        let stored = self.records.read().await;
        let mut counts: BTreeMap<PriceBand, u64> = BTreeMap::new();

        for s in stored.iter().filter(|s| filter.matches(&s.record)) {
            *counts.entry(PriceBand::classify(s.record.price)).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(band, count)| BandCount { band, count })
            .collect())
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>> {
        let stored = self.records.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

        for s in stored.iter().filter(|s| filter.matches(&s.record)) {
            *counts.entry(s.record.category.as_str()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect())
    }
}
