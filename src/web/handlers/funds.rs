use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{body_from, id_from, page_from, PageParams};
use crate::models::{Fund, FundUpdate, NewFund};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// List funds: GET /funds
pub async fn list_funds(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Fund>>> {
    let page = page_from(query)?;
    Ok(Json(state.services.funds.list(page).await?))
}

/// Create fund: POST /funds
pub async fn create_fund(
    State(state): State<AppState>,
    payload: Result<Json<NewFund>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Fund>)> {
    let fund = state.services.funds.create(body_from(payload)?).await?;
    Ok((StatusCode::CREATED, Json(fund)))
}

/// Replace fund: PUT /funds (id in body)
pub async fn update_fund(
    State(state): State<AppState>,
    payload: Result<Json<FundUpdate>, JsonRejection>,
) -> ApiResult<Json<Fund>> {
    Ok(Json(state.services.funds.update(body_from(payload)?).await?))
}

/// Get fund: GET /funds/{id}
pub async fn get_fund(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Fund>> {
    let id = id_from(path)?;
    Ok(Json(state.services.funds.get(id).await?))
}
