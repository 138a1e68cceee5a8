// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The query planner: turns a (page, perPage, storeLocation) request into
//! a bounded store read plus pagination metadata.
//!
//! The check order is part of the contract: page bounds are validated
//! against the freshly computed total before the per-page cap, and both
//! run before anything is fetched.

use serde::Serialize;
use tally_sales_store::{SaleFilter, SaleStore, StoreError};


#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryLimits {
    pub max_per_page: u64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self { max_per_page: 100 }
    }
}

/// A validated-shape listing request. `page` and `per_page` are 1-based;
/// an empty `store_location` means no filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
    pub store_location: Option<String>,
}

/// One page of matching sales plus the metadata clients paginate with.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalePage {
    pub data: Vec<tally_sales_model::StoredSale>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryErrorCode {
    Validation,
    InvalidPage,
    PerPageTooLarge,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
}

impl QueryError {
    #[must_use]
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for QueryError {}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        Self::new(QueryErrorCode::Store, value.to_string())
    }
}

/// Fetch one page of sales. Read-only; the store is never written.
///
/// With zero matching records `total_pages` is 0, so every `page >= 1`
/// fails the bounds check before the per-page cap is consulted.
pub async fn fetch_sales_page(
    store: &dyn SaleStore,
    req: &PageRequest,
    limits: &QueryLimits,
) -> Result<SalePage, QueryError> {
    if req.page == 0 || req.per_page == 0 {
        return Err(QueryError::new(
            QueryErrorCode::Validation,
            "page and perPage must be >= 1",
        ));
    }
    let filter = SaleFilter::by_store_location(req.store_location.clone());
    let total_records = store.count(&filter).await?;
    let total_pages = total_records.div_ceil(req.per_page);
    if req.page > total_pages {
        return Err(QueryError::new(
            QueryErrorCode::InvalidPage,
            format!("page {} is past the last page {total_pages}", req.page),
        ));
    }
    if req.per_page > limits.max_per_page {
        return Err(QueryError::new(
            QueryErrorCode::PerPageTooLarge,
            format!(
                "perPage {} exceeds the cap {}",
                req.per_page, limits.max_per_page
            ),
        ));
    }
    // page <= total_pages here, so the skip cannot overflow past count.
    let skip = (req.page - 1) * req.per_page;
    let data = store.find_page(&filter, skip, req.per_page).await?;
    Ok(SalePage {
        data,
        current_page: req.page,
        total_pages,
        total_records,
    })
}
