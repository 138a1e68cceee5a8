use crate::http::views;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use tally_sales_api::{map_error, parse_page_params, ApiError, SalePayload, SearchBody};
use tally_sales_model::parse_sale_id;
use tally_sales_query::{fetch_sales_page, QueryError, QueryErrorCode, SalePage};
use tally_sales_store::{StoreError, UpdateOutcome};
use tracing::error;

pub(crate) fn api_error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(map_error(err)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"message": err.message}))).into_response()
}

fn message_response(message: &str) -> Response {
    Json(json!({"message": message})).into_response()
}

fn store_failure(err: StoreError) -> ApiError {
    error!("store operation failed: {err}");
    ApiError::internal()
}

fn query_failure(err: QueryError) -> ApiError {
    if err.code == QueryErrorCode::Store {
        error!("store query failed: {}", err.message);
    }
    ApiError::from(err)
}

fn body_failure(err: JsonRejection) -> ApiError {
    ApiError::validation_failed(format!("invalid request body: {err}"))
}

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn respond(result: Result<Response, ApiError>, request_id: &str) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(err) => api_error_response(&err),
    };
    with_request_id(response, request_id)
}

pub(crate) async fn landing_handler() -> impl IntoResponse {
    Html(views::landing())
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn api_index_handler() -> impl IntoResponse {
    "Sales related routes"
}

pub(crate) async fn search_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    with_request_id(Html(views::search_form()).into_response(), &request_id)
}

pub(crate) async fn search_results_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let Json(body) = body.map_err(body_failure)?;
        let params = body.into_page_params()?;
        let page = fetch_sales_page(state.store.as_ref(), &params.into_request(), &state.limits)
            .await
            .map_err(query_failure)?;
        Ok(Html(views::results_page(&page)).into_response())
    }
    .await;
    respond(result, &request_id)
}

pub(crate) async fn list_sales_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = list_sales(&state, &params)
        .await
        .map(|page| Json(page).into_response());
    respond(result, &request_id)
}

async fn list_sales(
    state: &AppState,
    params: &BTreeMap<String, String>,
) -> Result<SalePage, ApiError> {
    let page_params = parse_page_params(params)?;
    fetch_sales_page(
        state.store.as_ref(),
        &page_params.into_request(),
        &state.limits,
    )
    .await
    .map_err(query_failure)
}

pub(crate) async fn create_sale_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SalePayload>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let Json(payload) = payload.map_err(body_failure)?;
        let sale = payload.validate()?;
        let stored = state.store.insert(sale).await.map_err(store_failure)?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    }
    .await;
    respond(result, &request_id)
}

pub(crate) async fn get_sale_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let sale_id = parse_sale_id(&id).map_err(|_| ApiError::sale_not_found())?;
        let stored = state
            .store
            .find_by_id(sale_id)
            .await
            .map_err(store_failure)?
            .ok_or_else(ApiError::sale_not_found)?;
        Ok(Json(stored).into_response())
    }
    .await;
    respond(result, &request_id)
}

pub(crate) async fn update_sale_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<SalePayload>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        // Field validation runs before the id is even looked at, so a
        // bad body on a bad id is still a 400.
        let Json(payload) = payload.map_err(body_failure)?;
        let sale = payload.validate()?;
        let sale_id = parse_sale_id(&id).map_err(|_| ApiError::sales_not_found())?;
        match state
            .store
            .replace(sale_id, sale)
            .await
            .map_err(store_failure)?
        {
            UpdateOutcome::Modified => Ok(message_response("Sales updated successfully")),
            UpdateOutcome::Unchanged => Ok(message_response(
                "Sales could not be updated. Nothing has changed.",
            )),
            UpdateOutcome::Missing => Err(ApiError::sales_not_found()),
        }
    }
    .await;
    respond(result, &request_id)
}

pub(crate) async fn delete_sale_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = async {
        let sale_id = parse_sale_id(&id).map_err(|_| ApiError::sale_not_found())?;
        let deleted = state.store.delete(sale_id).await.map_err(store_failure)?;
        if deleted {
            Ok(message_response("Sale deleted successfully"))
        } else {
            Err(ApiError::sale_not_found())
        }
    }
    .await;
    respond(result, &request_id)
}
