#![forbid(unsafe_code)]
//! Sale record model SSOT.
//!
//! Wire names are camelCase (`saleDate`, `storeLocation`, ...); every
//! struct here round-trips through serde unchanged.

mod sale;

pub use sale::{
    parse_sale_id, Customer, Sale, SaleId, SaleItem, StoredSale, ValidationError,
};

pub const CRATE_NAME: &str = "tally-sales-model";
