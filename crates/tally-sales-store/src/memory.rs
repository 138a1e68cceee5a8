// SPDX-License-Identifier: Apache-2.0

use crate::{SaleFilter, SaleStore, StoreError, UpdateOutcome};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tally_sales_model::{Sale, SaleId, StoredSale};
use tokio::sync::Mutex;

/// In-memory [`SaleStore`] for tests. Flip `fail` to make every
/// operation error, for exercising the internal-error path.
pub struct MemorySaleStore {
    pub rows: Mutex<Vec<StoredSale>>,
    pub next_id: AtomicI64,
    pub fail: AtomicBool,
}

impl Default for MemorySaleStore {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail: AtomicBool::new(false),
        }
    }
}

impl MemorySaleStore {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(StoreError("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SaleStore for MemorySaleStore {
    async fn insert(&self, sale: Sale) -> Result<StoredSale, StoreError> {
        self.check_available()?;
        let stored = StoredSale {
            id: SaleId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            sale,
        };
        self.rows.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn count(&self, filter: &SaleFilter) -> Result<u64, StoreError> {
        self.check_available()?;
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|r| filter.matches(&r.sale)).count() as u64)
    }

    async fn find_page(
        &self,
        filter: &SaleFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoredSale>, StoreError> {
        self.check_available()?;
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|r| filter.matches(&r.sale))
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: SaleId) -> Result<Option<StoredSale>, StoreError> {
        self.check_available()?;
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn replace(&self, id: SaleId, sale: Sale) -> Result<UpdateOutcome, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if row.sale == sale {
            return Ok(UpdateOutcome::Unchanged);
        }
        row.sale = sale;
        Ok(UpdateOutcome::Modified)
    }

    async fn delete(&self, id: SaleId) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}
