use salesboard_core::Transaction;
use salesboard_db::RecordStore;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

pub const DEFAULT_DATASET_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Records decoded from one fetch of the dataset.
#[derive(Debug, Clone, Default)]
pub struct FetchedBatch {
    pub records: Vec<Transaction>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: u64,
    pub skipped: usize,
}

/// Pulls the product transaction dataset and appends it to a record store.
#[derive(Clone)]
pub struct DatasetImporter {
    client: reqwest::Client,
    source_url: String,
}

impl DatasetImporter {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            source_url: source_url.into(),
        }
    }

    /// Download the dataset and coerce each element into a [`Transaction`].
    ///
    /// Elements that don't coerce are dropped and counted in
    /// [`FetchedBatch::skipped`]; they never abort the batch.
    pub async fn fetch(&self) -> Result<FetchedBatch> {
        tracing::info!("Fetching dataset from {}", self.source_url);

        let response = self.client.get(&self.source_url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let elements: Vec<Value> = serde_json::from_slice(&body)?;

        let mut batch = FetchedBatch::default();
        for (index, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<Transaction>(element) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping dataset element {}: {}", index, e);
                    batch.skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Decoded {} records ({} skipped)",
            batch.records.len(),
            batch.skipped
        );

        Ok(batch)
    }

    /// Fetch the dataset and insert every valid record.
    ///
    /// Nothing is deduplicated: importing twice stores every record twice.
    pub async fn import(&self, store: &dyn RecordStore) -> Result<ImportReport> {
        let batch = self.fetch().await?;
        let inserted = store.insert_many(&batch.records).await?;

        tracing::info!(
            "Imported {} records from {} ({} skipped)",
            inserted,
            self.source_url,
            batch.skipped
        );

        Ok(ImportReport {
            inserted,
            skipped: batch.skipped,
        })
    }
}

impl Default for DatasetImporter {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_core::RecordFilter;
    use salesboard_db::MemoryStore;

    const DATASET: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven  - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 329.85,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "sold": false,
            "dateOfSale": "2021-11-27T20:29:54+05:30"
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts ",
            "price": 44.6,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "sold": false,
            "dateOfSale": "2021-10-27T20:29:54+05:30"
        }
    ]"#;

    #[tokio::test]
    async fn test_fetch_decodes_dataset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/product_transaction.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DATASET)
            .create_async()
            .await;

        let importer = DatasetImporter::new(format!("{}/product_transaction.json", server.url()));
        let batch = importer.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 0);
        assert_eq!(batch.records[1].price, 44.6);
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_elements() {
        let mut server = mockito::Server::new_async().await;
        let body = DATASET.replacen("[", r#"[{"id": "not a record"},"#, 1);
        server
            .mock("GET", "/data.json")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let importer = DatasetImporter::new(format!("{}/data.json", server.url()));
        let batch = importer.fetch().await.unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 1);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data.json")
            .with_status(503)
            .create_async()
            .await;

        let importer = DatasetImporter::new(format!("{}/data.json", server.url()));
        let err = importer.fetch().await.unwrap_err();

        assert!(matches!(err, Error::Status(503)));
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_array_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data.json")
            .with_status(200)
            .with_body(r#"{"products": []}"#)
            .create_async()
            .await;

        let importer = DatasetImporter::new(format!("{}/data.json", server.url()));
        let err = importer.fetch().await.unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_import_twice_duplicates_records() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data.json")
            .with_status(200)
            .with_body(DATASET)
            .expect(2)
            .create_async()
            .await;

        let store = MemoryStore::new();
        let importer = DatasetImporter::new(format!("{}/data.json", server.url()));

        let first = importer.import(&store).await.unwrap();
        let second = importer.import(&store).await.unwrap();

        assert_eq!(first, ImportReport { inserted: 2, skipped: 0 });
        assert_eq!(second.inserted, 2);

        let all = store.find(&RecordFilter::all(), None).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].record, all[2].record);
        assert_eq!(all[1].record, all[3].record);
    }
}
