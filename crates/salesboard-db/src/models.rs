use chrono::{DateTime, Utc};
use salesboard_core::{StoredTransaction, Transaction};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub row_id: i64,
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    pub date_of_sale: DateTime<Utc>,
}

impl From<TransactionRow> for StoredTransaction {
    fn from(row: TransactionRow) -> Self {
        StoredTransaction::new(
            row.row_id,
            Transaction {
                id: row.id,
                title: row.title,
                price: row.price,
                description: row.description,
                category: row.category,
                image: row.image,
                sold: row.sold,
                date_of_sale: row.date_of_sale,
            },
        )
    }
}
