//! Content API endpoints.

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use serde::Deserialize;

use super::{parse_bounded, success, ApiResponse, ApiResult, Pagination};
use crate::errors::AppError;
use crate::models::{ContentItem, ContentQuery, ContentType};
use crate::shape::shape_items;
use crate::AppState;

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// List query parameters. Numbers are parsed by hand so a bad value is reported per parameter.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub slug: Option<String>,
}

pub(crate) fn content_type(segment: &str) -> Result<ContentType, AppError> {
    ContentType::from_segment(segment)
        .ok_or_else(|| AppError::NotFound(format!("Unknown content type: {}", segment)))
}

/// GET /content/:type - List items newest first, or look one up by slug.
pub async fn list_content(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<ContentItem>> {
    let Path(segment) = path?;
    let Query(params) = params?;
    let kind = content_type(&segment)?;

    // Slug lookups answer with zero or one item, never a 404.
    if let Some(slug) = params.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let page = state
            .repo
            .query_items(&ContentQuery::for_type(kind).slug(slug).limit(1))
            .await?;
        return success(shape_items(&state.repo, page.records).await?);
    }

    let page = parse_bounded("page", params.page.as_deref(), 1, 1..=u32::MAX)?;
    let per_page = parse_bounded(
        "per_page",
        params.per_page.as_deref(),
        DEFAULT_PER_PAGE,
        1..=MAX_PER_PAGE,
    )?;

    let result = state
        .repo
        .query_items(&ContentQuery::for_type(kind).paginate(page, per_page))
        .await?;
    let items = shape_items(&state.repo, result.records).await?;

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(result.total, page, per_page),
    ))
}

/// GET /content/:type/:id - Get a single item.
pub async fn get_content(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<ContentItem> {
    let Path((segment, id)) = path?;
    let kind = content_type(&segment)?;
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_param("id", "must be an integer"))?;

    let record = state
        .repo
        .get_item(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", kind.as_str(), id)))?;

    let item = shape_items(&state.repo, vec![record])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(format!("Shaping dropped item {}", id)))?;

    success(item)
}
