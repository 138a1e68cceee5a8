use crate::errors::ApiError;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tally_sales_model::{Customer, Sale, SaleItem};

/// Inbound sale payload for create and update. Every field is optional
/// at the serde layer; [`SalePayload::validate`] enforces presence so a
/// missing field becomes a 400 with the documented message instead of a
/// deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub sale_date: Option<DateTime<Utc>>,
    pub items: Option<Vec<SaleItemPayload>>,
    pub store_location: Option<String>,
    pub customer: Option<CustomerPayload>,
    pub coupon_used: Option<bool>,
    pub purchase_method: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleItemPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: Option<BigDecimal>,
    pub quantity: Option<i64>,
}

/// `age` and `satisfaction` stay raw JSON values here: clients send them
/// as numbers or numeric strings, and both are coerced to integers
/// during validation. Non-numeric input is rejected, never defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPayload {
    pub gender: Option<String>,
    pub age: Option<Value>,
    pub email: Option<String>,
    pub satisfaction: Option<Value>,
}

impl SalePayload {
    /// Presence check on every required top-level and nested field, then
    /// integer coercion. Presence is about the field existing in the
    /// JSON: `false` and `0` are present values.
    pub fn validate(self) -> Result<Sale, ApiError> {
        let sale_date = self.sale_date.ok_or_else(ApiError::missing_fields)?;
        let item_payloads = self.items.ok_or_else(ApiError::missing_fields)?;
        let store_location = self.store_location.ok_or_else(ApiError::missing_fields)?;
        let customer = self.customer.ok_or_else(ApiError::missing_fields)?;
        let coupon_used = self.coupon_used.ok_or_else(ApiError::missing_fields)?;
        let purchase_method = self.purchase_method.ok_or_else(ApiError::missing_fields)?;

        let mut items = Vec::with_capacity(item_payloads.len());
        for item in item_payloads {
            items.push(SaleItem {
                name: item.name.ok_or_else(ApiError::missing_fields)?,
                tags: item.tags,
                price: item.price.ok_or_else(ApiError::missing_fields)?,
                quantity: item.quantity.ok_or_else(ApiError::missing_fields)?,
            });
        }

        let gender = customer.gender.ok_or_else(ApiError::missing_fields)?;
        let email = customer.email.ok_or_else(ApiError::missing_fields)?;
        let age_raw = customer.age.ok_or_else(ApiError::missing_fields)?;
        let satisfaction_raw = customer.satisfaction.ok_or_else(ApiError::missing_fields)?;
        let age = coerce_integer(&age_raw)
            .ok_or_else(|| ApiError::validation_failed("customer.age must be numeric"))?;
        let satisfaction = coerce_integer(&satisfaction_raw).ok_or_else(|| {
            ApiError::validation_failed("customer.satisfaction must be numeric")
        })?;

        Ok(Sale {
            sale_date,
            items,
            store_location,
            customer: Customer {
                gender,
                age,
                email,
                satisfaction,
            },
            coupon_used,
            purchase_method,
        })
    }
}

/// Integer coercion: JSON integers pass through, floats truncate toward
/// zero, numeric strings parse (fractional ones truncate).
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Some(i)
            } else {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_integer(&json!(28)), Some(28));
        assert_eq!(coerce_integer(&json!(28.7)), Some(28));
        assert_eq!(coerce_integer(&json!("28")), Some(28));
        assert_eq!(coerce_integer(&json!(" 28 ")), Some(28));
        assert_eq!(coerce_integer(&json!("28.7")), Some(28));
        assert_eq!(coerce_integer(&json!(-3)), Some(-3));
        assert_eq!(coerce_integer(&json!("abc")), None);
        assert_eq!(coerce_integer(&json!(true)), None);
        assert_eq!(coerce_integer(&json!(null)), None);
    }
}
