//! REST API module.
//!
//! Contains all routes and handlers of the content gateway.

mod auth;
mod contact;
mod content;
mod menus;
mod search;
mod site;
mod taxonomies;

pub use auth::*;
pub use contact::*;
pub use content::*;
pub use menus::*;
pub use search::*;
pub use site::*;
pub use taxonomies::*;

use std::ops::RangeInclusive;

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cors::{TOTAL_HEADER, TOTAL_PAGES_HEADER};
use crate::errors::AppError;

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub total_pages: i64,
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(total: i64, page: u32, per_page: u32) -> Self {
        let per_page_i = i64::from(per_page.max(1));
        Self {
            total,
            total_pages: (total.max(0) + per_page_i - 1) / per_page_i,
            page,
            per_page,
        }
    }
}

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let pagination = self.pagination;
        let mut response = (StatusCode::OK, Json(self)).into_response();

        if let Some(p) = pagination {
            let headers = response.headers_mut();
            headers.insert(
                HeaderName::from_static(TOTAL_HEADER),
                HeaderValue::from(p.total),
            );
            headers.insert(
                HeaderName::from_static(TOTAL_PAGES_HEADER),
                HeaderValue::from(p.total_pages),
            );
        }

        response
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Parse an optional numeric query parameter, enforcing an inclusive range.
pub(crate) fn parse_bounded(
    param: &str,
    raw: Option<&str>,
    default: u32,
    range: RangeInclusive<u32>,
) -> Result<u32, AppError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(default);
    };

    let value: u32 = raw
        .parse()
        .map_err(|_| AppError::invalid_param(param, "must be a positive integer"))?;

    if !range.contains(&value) {
        return Err(AppError::invalid_param(
            param,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }

    Ok(value)
}
