#![forbid(unsafe_code)]
//! Wire-facing request shapes and the API error taxonomy.

mod error_mapping;
mod errors;
mod params;
mod payload;

pub use error_mapping::map_error;
pub use errors::{ApiError, ApiErrorCode};
pub use params::{parse_page_params, PageParams, SearchBody};
pub use payload::{CustomerPayload, SaleItemPayload, SalePayload};

pub const CRATE_NAME: &str = "tally-sales-api";
