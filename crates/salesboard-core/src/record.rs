use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product transaction as published by the upstream dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}

/// A transaction together with the key the store assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    #[serde(rename = "_id")]
    pub key: i64,
    #[serde(flatten)]
    pub record: Transaction,
}

impl StoredTransaction {
    pub fn new(key: i64, record: Transaction) -> Self {
        Self { key, record }
    }
}
