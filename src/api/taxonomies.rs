//! Taxonomy API endpoint.

use axum::extract::{rejection::PathRejection, Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Taxonomy, Term};
use crate::AppState;

/// GET /taxonomies/:taxonomy - All terms of a taxonomy, by name.
pub async fn list_terms(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<Term>> {
    let Path(segment) = path?;
    let taxonomy = Taxonomy::from_segment(&segment)
        .ok_or_else(|| AppError::NotFound(format!("Unknown taxonomy: {}", segment)))?;

    success(state.repo.list_terms(taxonomy).await?)
}
