// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The record-store seam: everything above this crate talks to sales
//! persistence through [`SaleStore`].

mod memory;
mod sqlite;

pub use memory::MemorySaleStore;
pub use sqlite::SqliteSaleStore;

use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use tally_sales_model::{Sale, SaleId, StoredSale};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Outcome of a whole-record replacement.
///
/// `Unchanged` means the id matched but the stored record already held
/// the submitted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Modified,
    Unchanged,
    Missing,
}

/// Restriction applied to listing queries. The only filter dimension is
/// an exact match on `storeLocation`; an empty string means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    store_location: Option<String>,
}

impl SaleFilter {
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn by_store_location(location: Option<String>) -> Self {
        Self {
            store_location: location.filter(|l| !l.is_empty()),
        }
    }

    #[must_use]
    pub fn store_location(&self) -> Option<&str> {
        self.store_location.as_deref()
    }

    #[must_use]
    pub fn matches(&self, sale: &Sale) -> bool {
        match &self.store_location {
            Some(location) => sale.store_location == *location,
            None => true,
        }
    }
}

/// A persistent collection of sale documents.
///
/// Implementations must assign insertion-ordered ids and keep
/// `find_page` iteration in that order; no other ordering is promised.
/// Single-document operations are atomic; nothing here batches or
/// retries.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn insert(&self, sale: Sale) -> Result<StoredSale, StoreError>;

    async fn count(&self, filter: &SaleFilter) -> Result<u64, StoreError>;

    /// The page of matching documents after skipping `skip`, at most
    /// `limit` long, in insertion order.
    async fn find_page(
        &self,
        filter: &SaleFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<StoredSale>, StoreError>;

    async fn find_by_id(&self, id: SaleId) -> Result<Option<StoredSale>, StoreError>;

    /// Replace every field of the record at `id`, distinguishing
    /// matched-but-unchanged from modified.
    async fn replace(&self, id: SaleId, sale: Sale) -> Result<UpdateOutcome, StoreError>;

    /// Returns whether a record was deleted.
    async fn delete(&self, id: SaleId) -> Result<bool, StoreError>;
}
