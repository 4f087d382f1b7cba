//! Menu API endpoint.

use axum::extract::{rejection::PathRejection, Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{build_menu_tree, MenuNode};
use crate::AppState;

fn is_valid_location(location: &str) -> bool {
    !location.is_empty()
        && location
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// GET /menus/:location - The menu assigned to a location, as a tree.
pub async fn get_menu(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<MenuNode>> {
    let Path(location) = path?;
    if !is_valid_location(&location) {
        return Err(AppError::invalid_param(
            "location",
            "may only contain letters, digits, '_' and '-'",
        ));
    }

    let items = state
        .repo
        .menu_items_for_location(&location)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu location not found".to_string()))?;

    success(build_menu_tree(&items, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_charset() {
        assert!(is_valid_location("primary"));
        assert!(is_valid_location("footer-menu_2"));
        assert!(!is_valid_location(""));
        assert!(!is_valid_location("main menu"));
        assert!(!is_valid_location("../etc"));
        assert!(!is_valid_location("menü"));
    }
}
