// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

#[must_use]
pub fn map_error(error: &ApiError) -> u16 {
    match error.code {
        ApiErrorCode::Unauthorized => 401,
        ApiErrorCode::ValidationFailed
        | ApiErrorCode::MissingFields
        | ApiErrorCode::InvalidPage
        | ApiErrorCode::PerPageTooLarge => 400,
        ApiErrorCode::NotFound => 404,
        _ => 500,
    }
}
