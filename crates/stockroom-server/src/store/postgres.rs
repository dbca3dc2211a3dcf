//! PostgreSQL store
//!
//! Uniqueness of `products.pid` is enforced by the primary key. Batch
//! inserts run in one transaction, so a concurrent upload that wins the race
//! makes the whole losing batch roll back with [`StoreError::DuplicateKey`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use stockroom_common::{NewProduct, NewSalesOrder, Product, ProductPatch, SalesOrder};
use uuid::Uuid;

use super::{repeated_keys, ProductStore, SalesOrderStore, StoreError, StoreResult};
use crate::db::is_unique_violation;

/// Rows per INSERT statement; 4 binds per row stays far below the 65535 limit.
const INSERT_CHUNK_SIZE: usize = 1000;

const PRODUCT_COLUMNS: &str = "pid, name, quantity, price, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Work out which SKUs made a batch insert hit the unique constraint
    async fn conflicting_pids(&self, batch: &[NewProduct]) -> StoreResult<Vec<String>> {
        let pids: Vec<String> = batch.iter().map(|p| p.pid.clone()).collect();
        let existing: Vec<String> = self.find(&pids).await?.into_iter().map(|p| p.pid).collect();
        Ok(select_conflicts(&pids, &existing))
    }
}

/// SKUs of `pids` that repeat in the batch or are already stored, in batch order
///
/// The clashing row may be deleted again before it is looked up; the whole
/// batch is reported then, never an empty list.
fn select_conflicts(pids: &[String], existing: &[String]) -> Vec<String> {
    let repeated = repeated_keys(pids.iter().map(String::as_str));

    let mut conflicts: Vec<String> = Vec::new();
    for pid in pids {
        let clashes = repeated.contains(pid) || existing.contains(pid);
        if clashes && !conflicts.contains(pid) {
            conflicts.push(pid.clone());
        }
    }

    if conflicts.is_empty() {
        let mut all: Vec<String> = Vec::new();
        for pid in pids {
            if !all.contains(pid) {
                all.push(pid.clone());
            }
        }
        return all;
    }
    conflicts
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    pid: String,
    name: String,
    quantity: i64,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            pid: row.pid,
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SalesOrderRow {
    id: Uuid,
    product_id: String,
    product_name: Option<String>,
    quantity_sold: i64,
    selling_price: f64,
    date: DateTime<Utc>,
}

impl From<SalesOrderRow> for SalesOrder {
    fn from(row: SalesOrderRow) -> Self {
        SalesOrder {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity_sold: row.quantity_sold,
            selling_price: row.selling_price,
            date: row.date,
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn find(&self, pids: &[String]) -> StoreResult<Vec<Product>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE pid = ANY($1) ORDER BY pid"
        ))
        .bind(pids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY pid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_one(&self, pid: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE pid = $1"
        ))
        .bind(pid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_one(&self, product: NewProduct) -> StoreResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (pid, name, quantity, price) VALUES ($1, $2, $3, $4) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.pid)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateKey(vec![product.pid.clone()])
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn insert_many(&self, products: Vec<NewProduct>) -> StoreResult<u64> {
        if products.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for chunk in products.chunks(INSERT_CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO products (pid, name, quantity, price) ");

            query_builder.push_values(chunk, |mut b, product| {
                b.push_bind(&product.pid)
                    .push_bind(&product.name)
                    .push_bind(product.quantity)
                    .push_bind(product.price);
            });

            let result = query_builder.build().execute(&mut *tx).await;
            match result {
                Ok(result) => inserted += result.rows_affected(),
                Err(e) if is_unique_violation(&e) => {
                    tx.rollback().await?;
                    let conflicts = self.conflicting_pids(&products).await?;
                    tracing::warn!(
                        conflicts = ?conflicts,
                        "Batch insert hit the unique constraint on products.pid"
                    );
                    return Err(StoreError::DuplicateKey(conflicts));
                },
                Err(e) => return Err(StoreError::Database(e)),
            }
        }

        tx.commit().await?;

        tracing::debug!(inserted, "Batch insert committed");
        Ok(inserted)
    }

    async fn update_one(&self, pid: &str, patch: ProductPatch) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
                 name = COALESCE($2, name), \
                 quantity = COALESCE($3, quantity), \
                 price = COALESCE($4, price), \
                 updated_at = NOW() \
             WHERE pid = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(pid)
        .bind(patch.name)
        .bind(patch.quantity)
        .bind(patch.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_one(&self, pid: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM products WHERE pid = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(pid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SalesOrderStore for PgStore {
    async fn insert(&self, order: NewSalesOrder) -> StoreResult<SalesOrder> {
        let order = order.into_sales_order(Utc::now());

        let row = sqlx::query_as::<_, SalesOrderRow>(
            r#"
            INSERT INTO sales_orders (id, product_id, product_name, quantity_sold, selling_price, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_id, product_name, quantity_sold, selling_price, date
            "#,
        )
        .bind(order.id)
        .bind(&order.product_id)
        .bind(&order.product_name)
        .bind(order.quantity_sold)
        .bind(order.selling_price)
        .bind(order.date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_all(&self) -> StoreResult<Vec<SalesOrder>> {
        let rows = sqlx::query_as::<_, SalesOrderRow>(
            r#"
            SELECT id, product_id, product_name, quantity_sold, selling_price, date
            FROM sales_orders
            ORDER BY date, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SalesOrder::from).collect())
    }
}
