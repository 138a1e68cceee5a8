use crate::errors::ApiError;
use serde::Deserialize;
use std::collections::BTreeMap;
use tally_sales_query::PageRequest;

/// Listing parameters after shape validation: both numbers present and
/// at least 1. The page-bounds and per-page-cap policy stays with the
/// query planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub per_page: u64,
    pub store_location: Option<String>,
}

impl PageParams {
    #[must_use]
    pub fn into_request(self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
            store_location: self.store_location,
        }
    }
}

pub fn parse_page_params(query: &BTreeMap<String, String>) -> Result<PageParams, ApiError> {
    Ok(PageParams {
        page: required_positive(query, "page")?,
        per_page: required_positive(query, "perPage")?,
        store_location: query.get("storeLocation").cloned(),
    })
}

fn required_positive(query: &BTreeMap<String, String>, name: &str) -> Result<u64, ApiError> {
    let raw = query
        .get(name)
        .ok_or_else(|| ApiError::validation_failed(format!("missing query parameter: {name}")))?;
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ApiError::validation_failed(format!("invalid query parameter: {name}")))?;
    if value == 0 {
        return Err(ApiError::validation_failed(format!(
            "query parameter {name} must be >= 1"
        )));
    }
    Ok(value)
}

/// Body of `POST /api/search`. Fields arrive optional so that absence is
/// reported as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub store_location: Option<String>,
}

impl SearchBody {
    pub fn into_page_params(self) -> Result<PageParams, ApiError> {
        let page = self
            .page
            .ok_or_else(|| ApiError::validation_failed("missing body field: page"))?;
        let per_page = self
            .per_page
            .ok_or_else(|| ApiError::validation_failed("missing body field: perPage"))?;
        if page == 0 || per_page == 0 {
            return Err(ApiError::validation_failed(
                "page and perPage must be >= 1",
            ));
        }
        Ok(PageParams {
            page,
            per_page,
            store_location: self.store_location,
        })
    }
}
