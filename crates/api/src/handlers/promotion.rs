//! Handlers for the `/promotions` resource.

use axum::extract::{OriginalUri, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promo_core::promotion::{ExtendInput, Promotion, PromotionInput};
use promo_core::query::{Criterion, QueryParams};
use promo_core::types::DbId;
use serde_json::Value;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// POST /promotions
///
/// Responds 201 with the stored promotion and a `Location` header.
pub async fn create(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<impl IntoResponse> {
    let input = PromotionInput::from_json(body)?;
    let promotion = state.promotions.create(input).await?;
    let location = format!("{}/{}", uri.path().trim_end_matches('/'), promotion.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(promotion)))
}

/// GET /promotions?{criterion}={value}
///
/// At most one criterion is honored; without one the whole collection is
/// returned.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QueryParams>,
) -> AppResult<Json<Vec<Promotion>>> {
    let criterion = Criterion::from_params(&params)?;
    let promotions = state.promotions.query(&criterion).await?;
    Ok(Json(promotions))
}

/// GET /promotions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Promotion>> {
    let promotion = state.promotions.get(id).await?;
    Ok(Json(promotion))
}

/// PUT /promotions/{id}
///
/// Field-level patch; omitted fields keep their value.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<Promotion>> {
    let patch = PromotionInput::from_json(body)?;
    let promotion = state.promotions.update(id, patch).await?;
    Ok(Json(promotion))
}

/// DELETE /promotions/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    state.promotions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /promotions/{id}/valid
pub async fn validate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Promotion>> {
    let promotion = state.promotions.set_validity(id, true).await?;
    Ok(Json(promotion))
}

/// DELETE /promotions/{id}/valid
pub async fn invalidate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Promotion>> {
    let promotion = state.promotions.set_validity(id, false).await?;
    Ok(Json(promotion))
}

/// PUT /promotions/{id}/extend
///
/// Body: `{ "end_date": "YYYY-MM-DD" }`.
pub async fn extend(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(body): ApiJson<Value>,
) -> AppResult<Json<Promotion>> {
    let end_date = ExtendInput::from_json(body)?.required_end_date()?;
    let promotion = state.promotions.extend(id, end_date).await?;
    Ok(Json(promotion))
}
