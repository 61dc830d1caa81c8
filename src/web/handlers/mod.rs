//! # Web API Handlers
//!
//! Thin adapters from HTTP extractors to the services. Extraction failures
//! (malformed path ids, query strings or JSON bodies) surface as 422.

pub mod funds;
pub mod health;
pub mod investments;
pub mod investors;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::Page;
use crate::web::response_types::{ApiError, ApiResult};

/// `?skip=&limit=` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// `skip >= 0` and `1 <= limit <= 1000`
    pub fn into_page(self) -> ApiResult<Page> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(i64::from(Page::DEFAULT_LIMIT));

        let skip = u32::try_from(skip)
            .map_err(|_| ApiError::invalid_request("skip must be greater than or equal to 0"))?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|limit| (1..=Page::MAX_LIMIT).contains(limit))
            .ok_or_else(|| {
                ApiError::invalid_request(format!(
                    "limit must be between 1 and {}",
                    Page::MAX_LIMIT
                ))
            })?;

        Ok(Page::new(skip, limit))
    }
}

pub(crate) fn page_from(query: Result<Query<PageParams>, QueryRejection>) -> ApiResult<Page> {
    let Query(params) = query.map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
    params.into_page()
}

pub(crate) fn id_from(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
}

pub(crate) fn body_from<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
}
