use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Store-assigned identifier of a persisted [`Sale`].
///
/// The store hands these out in insertion order; the value carries no
/// other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub i64);

impl Display for SaleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn parse_sale_id(input: &str) -> Result<SaleId, ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError("sale id must not be empty".to_string()));
    }
    s.parse::<i64>()
        .map(SaleId)
        .map_err(|_| ValidationError(format!("sale id must be an integer, got {s:?}")))
}

/// One line item of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: BigDecimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub gender: String,
    pub age: i64,
    pub email: String,
    pub satisfaction: i64,
}

/// A fully validated sale record, as persisted.
///
/// Mutation is whole-record replacement; there is no partial update,
/// versioning, or soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItem>,
    pub store_location: String,
    pub customer: Customer,
    pub coupon_used: bool,
    pub purchase_method: String,
}

/// A [`Sale`] together with its store-assigned id, the shape returned to
/// clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSale {
    pub id: SaleId,
    #[serde(flatten)]
    pub sale: Sale,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_sale() -> Sale {
        Sale {
            sale_date: "2024-03-01T12:00:00Z".parse().expect("timestamp"),
            items: vec![SaleItem {
                name: "notepad".to_string(),
                tags: vec!["office".to_string(), "writing".to_string()],
                price: BigDecimal::from_str("4.75").expect("decimal"),
                quantity: 2,
            }],
            store_location: "Denver".to_string(),
            customer: Customer {
                gender: "F".to_string(),
                age: 42,
                email: "customer@example.com".to_string(),
                satisfaction: 4,
            },
            coupon_used: false,
            purchase_method: "In store".to_string(),
        }
    }

    #[test]
    fn wire_names_are_camel_case() {
        let value = serde_json::to_value(sample_sale()).expect("serialize sale");
        for key in [
            "saleDate",
            "items",
            "storeLocation",
            "customer",
            "couponUsed",
            "purchaseMethod",
        ] {
            assert!(value.get(key).is_some(), "missing wire field {key}");
        }
        assert!(value.get("sale_date").is_none());
    }

    #[test]
    fn stored_sale_flattens_id_next_to_record_fields() {
        let stored = StoredSale {
            id: SaleId(7),
            sale: sample_sale(),
        };
        let value = serde_json::to_value(&stored).expect("serialize stored sale");
        assert_eq!(value.get("id").and_then(serde_json::Value::as_i64), Some(7));
        assert!(value.get("storeLocation").is_some());
        let back: StoredSale = serde_json::from_value(value).expect("round trip");
        assert_eq!(back, stored);
    }

    #[test]
    fn sale_id_parses_integers_only() {
        assert_eq!(parse_sale_id("12"), Ok(SaleId(12)));
        assert_eq!(parse_sale_id(" 12 "), Ok(SaleId(12)));
        assert!(parse_sale_id("").is_err());
        assert!(parse_sale_id("abc").is_err());
        assert!(parse_sale_id("65f1c0ffee").is_err());
    }
}
