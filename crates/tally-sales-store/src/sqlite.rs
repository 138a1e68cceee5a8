// SPDX-License-Identifier: Apache-2.0

use crate::{SaleFilter, SaleStore, StoreError, UpdateOutcome};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tally_sales_model::{Sale, SaleId, StoredSale};

/// SQLite-backed [`SaleStore`].
///
/// Each sale is one row: the full document as JSON in `doc`, with
/// `store_location` denormalized for exact-match filtering. The rowid is
/// the record id, so rowid order is insertion order.
pub struct SqliteSaleStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSaleStore {
    /// Opens (and initializes) the database named by a connection
    /// string: a filesystem path, optionally prefixed with `sqlite:`.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
        if path.is_empty() {
            return Err(StoreError("database url must not be empty".to_string()));
        }
        let conn = Connection::open(path)
            .map_err(|e| StoreError(format!("open {path} failed: {e}")))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError(format!("open in-memory store failed: {e}")))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sales (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 store_location TEXT NOT NULL,
                 doc TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_sales_store_location
                 ON sales(store_location);",
        )
        .map_err(|e| StoreError(format!("schema init failed: {e}")))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError("store mutex poisoned".to_string()))?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| StoreError(format!("store task failed: {e}")))?
    }
}

fn encode_doc(sale: &Sale) -> Result<String, StoreError> {
    serde_json::to_string(sale).map_err(|e| StoreError(format!("encode sale failed: {e}")))
}

fn decode_doc(doc: &str) -> Result<Sale, StoreError> {
    serde_json::from_str(doc).map_err(|e| StoreError(format!("decode sale failed: {e}")))
}

fn to_sql_count(value: u64, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError(format!("{what} out of range: {value}")))
}

#[async_trait]
impl SaleStore for SqliteSaleStore {
    async fn insert(&self, sale: Sale) -> Result<StoredSale, StoreError> {
        self.with_conn(move |conn| {
            let doc = encode_doc(&sale)?;
            conn.execute(
                "INSERT INTO sales (store_location, doc) VALUES (?1, ?2)",
                rusqlite::params![sale.store_location, doc],
            )
            .map_err(|e| StoreError(format!("insert failed: {e}")))?;
            Ok(StoredSale {
                id: SaleId(conn.last_insert_rowid()),
                sale,
            })
        })
        .await
    }

    async fn count(&self, filter: &SaleFilter) -> Result<u64, StoreError> {
        let location = filter.store_location().map(str::to_string);
        self.with_conn(move |conn| {
            let total: i64 = match &location {
                Some(loc) => conn
                    .query_row(
                        "SELECT COUNT(*) FROM sales WHERE store_location = ?1",
                        [loc],
                        |row| row.get(0),
                    )
                    .map_err(|e| StoreError(format!("count failed: {e}")))?,
                None => conn
                    .query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))
                    .map_err(|e| StoreError(format!("count failed: {e}")))?,
            };
            Ok(total as u64)
        })
        .await
    }

    async fn find_page(
        &self,
        filter: &SaleFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoredSale>, StoreError> {
        let location = filter.store_location().map(str::to_string);
        self.with_conn(move |conn| {
            let skip = to_sql_count(skip, "skip")?;
            let limit = to_sql_count(limit, "limit")?;
            let raw: Vec<(i64, String)> = match &location {
                Some(loc) => {
                    let mut stmt = conn
                        .prepare(
                            "SELECT id, doc FROM sales WHERE store_location = ?1
                             ORDER BY id LIMIT ?2 OFFSET ?3",
                        )
                        .map_err(|e| StoreError(format!("page prepare failed: {e}")))?;
                    let rows = stmt
                        .query_map(rusqlite::params![loc, limit, skip], |row| {
                            Ok((row.get(0)?, row.get(1)?))
                        })
                        .map_err(|e| StoreError(format!("page query failed: {e}")))?;
                    rows.collect::<Result<_, _>>()
                        .map_err(|e| StoreError(format!("page row failed: {e}")))?
                }
                None => {
                    let mut stmt = conn
                        .prepare("SELECT id, doc FROM sales ORDER BY id LIMIT ?1 OFFSET ?2")
                        .map_err(|e| StoreError(format!("page prepare failed: {e}")))?;
                    let rows = stmt
                        .query_map(rusqlite::params![limit, skip], |row| {
                            Ok((row.get(0)?, row.get(1)?))
                        })
                        .map_err(|e| StoreError(format!("page query failed: {e}")))?;
                    rows.collect::<Result<_, _>>()
                        .map_err(|e| StoreError(format!("page row failed: {e}")))?
                }
            };
            let mut page = Vec::with_capacity(raw.len());
            for (id, doc) in raw {
                page.push(StoredSale {
                    id: SaleId(id),
                    sale: decode_doc(&doc)?,
                });
            }
            Ok(page)
        })
        .await
    }

    async fn find_by_id(&self, id: SaleId) -> Result<Option<StoredSale>, StoreError> {
        self.with_conn(move |conn| {
            let doc: Option<String> = conn
                .query_row("SELECT doc FROM sales WHERE id = ?1", [id.0], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|e| StoreError(format!("lookup failed: {e}")))?;
            match doc {
                Some(doc) => Ok(Some(StoredSale {
                    id,
                    sale: decode_doc(&doc)?,
                })),
                None => Ok(None),
            }
        })
        .await
    }

    async fn replace(&self, id: SaleId, sale: Sale) -> Result<UpdateOutcome, StoreError> {
        self.with_conn(move |conn| {
            // Read-before-write: changes() counts matched rows, so the
            // matched-but-unchanged outcome needs the current document.
            let tx = conn
                .transaction()
                .map_err(|e| StoreError(format!("replace tx failed: {e}")))?;
            let current: Option<String> = tx
                .query_row("SELECT doc FROM sales WHERE id = ?1", [id.0], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|e| StoreError(format!("replace lookup failed: {e}")))?;
            let Some(current) = current else {
                return Ok(UpdateOutcome::Missing);
            };
            if decode_doc(&current)? == sale {
                return Ok(UpdateOutcome::Unchanged);
            }
            let doc = encode_doc(&sale)?;
            tx.execute(
                "UPDATE sales SET store_location = ?1, doc = ?2 WHERE id = ?3",
                rusqlite::params![sale.store_location, doc, id.0],
            )
            .map_err(|e| StoreError(format!("replace failed: {e}")))?;
            tx.commit()
                .map_err(|e| StoreError(format!("replace commit failed: {e}")))?;
            Ok(UpdateOutcome::Modified)
        })
        .await
    }

    async fn delete(&self, id: SaleId) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let deleted = conn
                .execute("DELETE FROM sales WHERE id = ?1", [id.0])
                .map_err(|e| StoreError(format!("delete failed: {e}")))?;
            Ok(deleted > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use tally_sales_model::{Customer, SaleItem};

    fn sale(location: &str, age: i64) -> Sale {
        Sale {
            sale_date: "2024-01-15T09:30:00Z".parse().expect("timestamp"),
            items: vec![SaleItem {
                name: "binder".to_string(),
                tags: vec!["office".to_string()],
                price: BigDecimal::from_str("13.44").expect("decimal"),
                quantity: 3,
            }],
            store_location: location.to_string(),
            customer: Customer {
                gender: "M".to_string(),
                age,
                email: "buyer@example.com".to_string(),
                satisfaction: 3,
            },
            coupon_used: true,
            purchase_method: "Online".to_string(),
        }
    }

    #[tokio::test]
    async fn pages_come_back_in_insertion_order() {
        let store = SqliteSaleStore::open_in_memory().expect("open store");
        for age in 20..25 {
            store.insert(sale("Austin", age)).await.expect("insert");
        }
        let page = store
            .find_page(&SaleFilter::unfiltered(), 1, 2)
            .await
            .expect("page");
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].sale.customer.age, 21);
        assert_eq!(page[1].sale.customer.age, 22);
        assert!(page[0].id < page[1].id);
    }

    #[tokio::test]
    async fn filter_is_exact_match_on_location() {
        let store = SqliteSaleStore::open_in_memory().expect("open store");
        store.insert(sale("Austin", 30)).await.expect("insert");
        store.insert(sale("Boston", 31)).await.expect("insert");
        store.insert(sale("Austin", 32)).await.expect("insert");

        let filter = SaleFilter::by_store_location(Some("Austin".to_string()));
        assert_eq!(store.count(&filter).await.expect("count"), 2);
        assert_eq!(
            store.count(&SaleFilter::unfiltered()).await.expect("count"),
            3
        );
        // Empty string means unfiltered, not match-nothing.
        let empty = SaleFilter::by_store_location(Some(String::new()));
        assert_eq!(store.count(&empty).await.expect("count"), 3);
    }

    #[tokio::test]
    async fn replace_distinguishes_unchanged_from_modified() {
        let store = SqliteSaleStore::open_in_memory().expect("open store");
        let stored = store.insert(sale("Austin", 30)).await.expect("insert");

        let outcome = store
            .replace(stored.id, sale("Austin", 30))
            .await
            .expect("replace");
        assert_eq!(outcome, UpdateOutcome::Unchanged);

        let outcome = store
            .replace(stored.id, sale("Boston", 30))
            .await
            .expect("replace");
        assert_eq!(outcome, UpdateOutcome::Modified);
        let found = store
            .find_by_id(stored.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.sale.store_location, "Boston");

        let outcome = store
            .replace(SaleId(9999), sale("Austin", 30))
            .await
            .expect("replace");
        assert_eq!(outcome, UpdateOutcome::Missing);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = SqliteSaleStore::open_in_memory().expect("open store");
        let stored = store.insert(sale("Austin", 30)).await.expect("insert");
        assert!(store.delete(stored.id).await.expect("delete"));
        assert!(!store.delete(stored.id).await.expect("delete again"));
        assert!(store
            .find_by_id(stored.id)
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn survives_reopen_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sales.db");
        let url = format!("sqlite:{}", path.display());
        let id = {
            let store = SqliteSaleStore::open(&url).expect("open store");
            store.insert(sale("Austin", 30)).await.expect("insert").id
        };
        let store = SqliteSaleStore::open(&url).expect("reopen store");
        let found = store.find_by_id(id).await.expect("lookup").expect("present");
        assert_eq!(found.sale.store_location, "Austin");
    }
}
