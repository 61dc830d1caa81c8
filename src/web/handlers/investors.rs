use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::{body_from, page_from, PageParams};
use crate::models::{Investor, NewInvestor};
use crate::web::response_types::ApiResult;
use crate::web::state::AppState;

/// List investors: GET /investors
pub async fn list_investors(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Investor>>> {
    let page = page_from(query)?;
    Ok(Json(state.services.investors.list(page).await?))
}

/// Register investor: POST /investors
pub async fn create_investor(
    State(state): State<AppState>,
    payload: Result<Json<NewInvestor>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Investor>)> {
    let investor = state.services.investors.create(body_from(payload)?).await?;
    Ok((StatusCode::CREATED, Json(investor)))
}
