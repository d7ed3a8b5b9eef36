use crate::{models::TransactionRow, Error, RecordStore, Result};
use async_trait::async_trait;
use salesboard_core::{
    report::OPEN_BAND_FLOOR, BandCount, CategoryCount, MonthConstraint, Page, PriceBand,
    RecordFilter, StoredTransaction, Transaction, YearPolicy,
};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};

const SELECT_TRANSACTIONS: &str = "SELECT row_id, id, title, price, description, category, image, sold, date_of_sale FROM transactions";

/// Postgres caps a statement at 65535 bind parameters; each row binds 8.
const INSERT_CHUNK: usize = 4096;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Create new database connection
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                row_id BIGSERIAL PRIMARY KEY,
                id BIGINT NOT NULL,
                title TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                image TEXT NOT NULL,
                sold BOOLEAN NOT NULL,
                date_of_sale TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_date_of_sale ON transactions(date_of_sale)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// ============================================================================
// Query building
// ============================================================================

/// Appends a `WHERE` clause equivalent to [`RecordFilter::matches`].
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    qb.push(" WHERE TRUE");

    match filter.month {
        MonthConstraint::Any => {}
        MonthConstraint::Nothing => {
            qb.push(" AND FALSE");
        }
        MonthConstraint::Window(window) => match window.policy() {
            YearPolicy::Projected => {
                qb.push(" AND EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC') = ");
                qb.push_bind(window.month() as i32);
            }
            YearPolicy::Absolute => {
                qb.push(" AND date_of_sale >= ");
                qb.push_bind(window.start());
                qb.push(" AND date_of_sale < ");
                qb.push_bind(window.end());
            }
        },
    }

    if let Some(sold) = filter.sold {
        qb.push(" AND sold = ");
        qb.push_bind(sold);
    }

    if let Some(term) = &filter.search {
        qb.push(" AND (strpos(lower(title), lower(");
        qb.push_bind(term.text().to_string());
        qb.push(")) > 0 OR strpos(lower(description), lower(");
        qb.push_bind(term.text().to_string());
        qb.push(")) > 0");
        if let Some(price) = term.price() {
            qb.push(" OR price = ");
            qb.push_bind(price);
        }
        qb.push(")");
    }
}

/// SQL `CASE` expression mapping `price` to a [`PriceBand`] label.
fn price_band_case() -> String {
    let mut sql = String::from("CASE");
    for (upper, band) in PriceBand::bounded() {
        sql.push_str(&format!(" WHEN price <= {:?} THEN '{}'", upper, band.label()));
    }
    sql.push_str(&format!(
        " WHEN price >= {:?} THEN '{}' ELSE '{}' END",
        OPEN_BAND_FLOOR,
        PriceBand::Above900.label(),
        PriceBand::Other.label()
    ));
    sql
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

// ============================================================================
// Record Store
// ============================================================================

#[async_trait]
impl RecordStore for Database {
    async fn insert_many(&self, records: &[Transaction]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chunk in records.chunks(INSERT_CHUNK) {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO transactions (id, title, price, description, category, image, sold, date_of_sale) ",
            );
            qb.push_values(chunk, |mut row, record| {
                row.push_bind(record.id)
                    .push_bind(record.title.clone())
                    .push_bind(record.price)
                    .push_bind(record.description.clone())
                    .push_bind(record.category.clone())
                    .push_bind(record.image.clone())
                    .push_bind(record.sold)
                    .push_bind(record.date_of_sale);
            });

            inserted += qb.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        tracing::info!("Inserted {} transactions", inserted);

        Ok(inserted)
    }

    async fn find(&self, filter: &RecordFilter, page: Option<Page>) -> Result<Vec<StoredTransaction>> {
        let mut qb = QueryBuilder::<Postgres>::new(SELECT_TRANSACTIONS);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY row_id");

        if let Some(page) = page {
            qb.push(" OFFSET ");
            qb.push_bind(i64::try_from(page.skip).unwrap_or(i64::MAX));
            qb.push(" LIMIT ");
            qb.push_bind(i64::try_from(page.limit).unwrap_or(i64::MAX));
        }

        let rows = qb
            .build_query_as::<TransactionRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StoredTransaction::from).collect())
    }

    async fn count(&self, filter: &RecordFilter) -> Result<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM transactions");
        push_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(to_count(count))
    }

    async fn sum_price(&self, filter: &RecordFilter) -> Result<f64> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT COALESCE(SUM(price), 0)::DOUBLE PRECISION FROM transactions",
        );
        push_filter(&mut qb, filter);

        let total: f64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total)
    }

    async fn count_by_price_band(&self, filter: &RecordFilter) -> Result<Vec<BandCount>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} AS band, COUNT(*) AS count FROM transactions",
            price_band_case()
        ));
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY band");

        let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(&self.pool).await?;

        let mut bands = rows
            .into_iter()
            .map(|(label, count)| {
                let band = label
                    .parse::<PriceBand>()
                    .map_err(|e| Error::Query(e.to_string()))?;
                Ok(BandCount {
                    band,
                    count: to_count(count),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        bands.sort_by_key(|b| b.band);

        Ok(bands)
    }

    async fn count_by_category(&self, filter: &RecordFilter) -> Result<Vec<CategoryCount>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT category, COUNT(*) FROM transactions");
        push_filter(&mut qb, filter);
        qb.push(" GROUP BY category ORDER BY category");

        let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category,
                count: to_count(count),
            })
            .collect())
    }
}


// ============================================================================
// Database Tests
// ============================================================================
