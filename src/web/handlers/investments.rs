use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{body_from, id_from, page_from, PageParams};
use crate::models::{Investment, NewInvestment};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// List a fund's investments: GET /funds/{fund_id}/investments
pub async fn list_investments(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Investment>>> {
    let fund_id = id_from(path)?;
    let page = page_from(query)?;
    Ok(Json(
        state.services.investments.list_by_fund(fund_id, page).await?,
    ))
}

/// Invest in a fund: POST /funds/{fund_id}/investments
pub async fn create_investment(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NewInvestment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Investment>)> {
    let fund_id = id_from(path)?;
    let investment = state
        .services
        .investments
        .create(fund_id, body_from(payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(investment)))
}
