// SPDX-License-Identifier: Apache-2.0

use crate::http::handlers::api_error_response;
use crate::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tally_sales_api::ApiError;
use tracing::warn;

/// The access gate: a shared static secret in the `API-Key` header,
/// checked before any handler logic on every gated route.
pub(crate) async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    match provided {
        Some(key) if !state.api.api_key.is_empty() && key == state.api.api_key => {
            next.run(req).await
        }
        Some(_) => {
            warn!(path = %req.uri().path(), "rejected request with wrong api key");
            api_error_response(&ApiError::unauthorized())
        }
        None => {
            warn!(path = %req.uri().path(), "rejected request without api key");
            api_error_response(&ApiError::unauthorized())
        }
    }
}
