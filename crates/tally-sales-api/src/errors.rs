// SPDX-License-Identifier: Apache-2.0

use tally_sales_query::{QueryError, QueryErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiErrorCode {
    Unauthorized,
    ValidationFailed,
    MissingFields,
    InvalidPage,
    PerPageTooLarge,
    NotFound,
    Internal,
}

/// A handler-level failure with its client-visible message. The message
/// is the whole client-facing payload; anything richer goes to the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(
            ApiErrorCode::Unauthorized,
            "You are not authorized to access this resource.",
        )
    }

    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::ValidationFailed, message)
    }

    #[must_use]
    pub fn missing_fields() -> Self {
        Self::new(ApiErrorCode::MissingFields, "Missing required fields")
    }

    #[must_use]
    pub fn invalid_page() -> Self {
        Self::new(ApiErrorCode::InvalidPage, "Invalid page value")
    }

    #[must_use]
    pub fn per_page_too_large() -> Self {
        Self::new(ApiErrorCode::PerPageTooLarge, "perPage value too large")
    }

    #[must_use]
    pub fn sale_not_found() -> Self {
        Self::new(ApiErrorCode::NotFound, "Sale not found")
    }

    #[must_use]
    pub fn sales_not_found() -> Self {
        Self::new(ApiErrorCode::NotFound, "Sales not found")
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorCode::Internal, "Internal server error")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for ApiError {}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        match value.code {
            QueryErrorCode::InvalidPage => Self::invalid_page(),
            QueryErrorCode::PerPageTooLarge => Self::per_page_too_large(),
            QueryErrorCode::Validation => Self::validation_failed(value.message),
            _ => Self::internal(),
        }
    }
}
