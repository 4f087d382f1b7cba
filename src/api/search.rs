//! Search API endpoint.

use axum::extract::{rejection::QueryRejection, Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{ContentItem, ContentType};
use crate::shape::shape_items;
use crate::AppState;

/// Maximum number of results per call.
const MAX_SEARCH_RESULTS: usize = 20;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Search results with the pre-cap match count and the echoed query.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<ContentItem>,
    pub total: usize,
    pub query: String,
}

/// GET /search - Full-text search over articles, projects and team members.
pub async fn search_content(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<SearchResponse> {
    let Query(params) = params?;
    let query = params
        .query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::invalid_param("query", "must not be empty"))?;

    let hits = state
        .search
        .search(&query, &ContentType::SEARCHABLE, MAX_SEARCH_RESULTS)?;

    // Hits for items unpublished since the last rebuild are dropped here.
    let records = state.repo.items_by_ids(&hits.ids).await?;
    let results = shape_items(&state.repo, records).await?;

    success(SearchResponse {
        results,
        total: hits.total,
        query,
    })
}
