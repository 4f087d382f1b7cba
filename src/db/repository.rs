//! Read-only repository over the content store.
//!
//! Every content query is restricted to published rows.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    ContentPage, ContentQuery, ContentRecord, ContentType, MediaRecord, MenuItemRecord,
    SiteOptions, Taxonomy, Term, UserRecord,
};

const PUBLISHED: &str = "publish";

const POST_COLUMNS: &str = "id, post_type, title, slug, content, excerpt, published_at, author_id, featured_media_id, fields";

const USER_COLUMNS: &str = "id, username, email, display_name, description, password_hash";

/// Database repository for all content reads.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== CONTENT ====================

    /// Run a content query, returning the requested page and the total match count.
    pub async fn query_items(&self, query: &ContentQuery) -> Result<ContentPage, AppError> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) AS total FROM posts");
        push_filters(&mut count, query);
        let total: i64 = count.build().fetch_one(&self.pool).await?.get("total");

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM posts", POST_COLUMNS));
        push_filters(&mut select, query);
        // Dates carry their own UTC offsets, so compare instants rather than text.
        select.push(" ORDER BY julianday(published_at) DESC, id DESC");
        if let Some(per_page) = query.per_page {
            select
                .push(" LIMIT ")
                .push_bind(i64::from(per_page))
                .push(" OFFSET ")
                .push_bind(query.offset());
        }

        let rows = select.build().fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(content_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentPage { records, total })
    }

    /// Get a published item of the given type by ID.
    pub async fn get_item(
        &self,
        kind: ContentType,
        id: i64,
    ) -> Result<Option<ContentRecord>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE id = ? AND post_type = ? AND status = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .bind(kind.as_str())
        .bind(PUBLISHED)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(content_from_row).transpose()
    }

    /// Fetch published items by ID, in the order given. Unknown IDs are skipped.
    pub async fn items_by_ids(&self, ids: &[i64]) -> Result<Vec<ContentRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM posts", POST_COLUMNS));
        select.push(" WHERE status = ").push_bind(PUBLISHED);
        select.push(" AND id IN ");
        push_id_list(&mut select, ids);

        let rows = select.build().fetch_all(&self.pool).await?;
        let mut by_id = rows
            .iter()
            .map(|row| content_from_row(row).map(|record| (record.id, record)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    // ==================== USERS & MEDIA ====================

    /// Load authors keyed by ID.
    pub async fn authors_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, UserRecord>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        select.push(" WHERE id IN ");
        push_id_list(&mut select, ids);

        let rows = select.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(user_from_row)
            .map(|user| (user.id, user))
            .collect())
    }

    /// Load media uploads keyed by ID.
    pub async fn media_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, MediaRecord>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut select = QueryBuilder::<Sqlite>::new("SELECT id, url, width, height, alt FROM media");
        select.push(" WHERE id IN ");
        push_id_list(&mut select, ids);

        let rows = select.build().fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(media_from_row)
            .map(|media| (media.id, media))
            .collect())
    }

    /// Find an account by username or email (case-insensitive).
    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ? OR lower(email) = lower(?) LIMIT 1",
            USER_COLUMNS
        ))
        .bind(login)
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get an account by ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== MENUS, TERMS, OPTIONS ====================

    /// Flat items of the menu assigned to a location, in position order.
    /// Returns `None` when the location is unknown.
    pub async fn menu_items_for_location(
        &self,
        location: &str,
    ) -> Result<Option<Vec<MenuItemRecord>>, AppError> {
        let menu_id: Option<i64> =
            sqlx::query("SELECT menu_id FROM menu_locations WHERE location = ?")
                .bind(location)
                .fetch_optional(&self.pool)
                .await?
                .map(|row| row.get("menu_id"));

        let Some(menu_id) = menu_id else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT id, parent_id, position, title, url FROM menu_items WHERE menu_id = ? ORDER BY position, id",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(
            rows.iter()
                .map(|row| MenuItemRecord {
                    id: row.get("id"),
                    parent_id: row.get("parent_id"),
                    position: row.get("position"),
                    title: row.get("title"),
                    url: row.get("url"),
                })
                .collect(),
        ))
    }

    /// List the terms of a taxonomy with their published item counts.
    pub async fn list_terms(&self, taxonomy: Taxonomy) -> Result<Vec<Term>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.slug, t.parent_id,
                (SELECT COUNT(*) FROM post_terms pt
                    JOIN posts p ON p.id = pt.post_id
                    WHERE pt.term_id = t.id AND p.status = ? AND p.post_type = ?) AS item_count
            FROM terms t
            WHERE t.taxonomy = ?
            ORDER BY t.name, t.id
            "#,
        )
        .bind(PUBLISHED)
        .bind(taxonomy.content_type().as_str())
        .bind(taxonomy.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let parent: Option<i64> = row.get("parent_id");
                Term {
                    id: row.get("id"),
                    taxonomy,
                    name: row.get("name"),
                    slug: row.get("slug"),
                    parent: parent.filter(|p| *p != 0 && taxonomy.is_hierarchical()),
                    count: row.get("item_count"),
                }
            })
            .collect())
    }

    /// Load every site option.
    pub async fn load_options(&self) -> Result<SiteOptions, AppError> {
        let rows = sqlx::query("SELECT name, value FROM options")
            .fetch_all(&self.pool)
            .await?;

        Ok(SiteOptions(
            rows.iter()
                .map(|row| (row.get("name"), row.get("value")))
                .collect(),
        ))
    }
}

/// Append the WHERE clause of a content query.
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &ContentQuery) {
    builder.push(" WHERE status = ").push_bind(PUBLISHED);

    if !query.types.is_empty() {
        builder.push(" AND post_type IN (");
        let mut types = builder.separated(", ");
        for kind in &query.types {
            types.push_bind(kind.as_str());
        }
        types.push_unseparated(")");
    }

    if let Some(slug) = &query.slug {
        builder.push(" AND slug = ").push_bind(slug.clone());
    }

    if let Some(meta) = &query.meta {
        // Rows with an unparseable bag never match instead of failing the query.
        builder
            .push(" AND CASE WHEN json_valid(fields) THEN CAST(json_extract(fields, ")
            .push_bind(format!("$.{}", meta.key))
            .push(") AS TEXT) END = ")
            .push_bind(meta.value.clone());
    }
}

/// Append `(?, ?, ...)` for a non-empty ID list.
fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    builder.push("(");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
}

fn content_from_row(row: &SqliteRow) -> Result<ContentRecord, AppError> {
    let post_type: String = row.get("post_type");
    let kind = ContentType::from_segment(&post_type)
        .ok_or_else(|| AppError::Database(format!("Unknown post type: {}", post_type)))?;

    Ok(ContentRecord {
        id: row.get("id"),
        kind,
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        date: row.get("published_at"),
        author_id: row.get("author_id"),
        featured_media_id: row.get("featured_media_id"),
        fields: row.get("fields"),
    })
}

fn user_from_row(row: &SqliteRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        description: row.get("description"),
        password_hash: row.get("password_hash"),
    }
}

fn media_from_row(row: &SqliteRow) -> MediaRecord {
    let dimension = |name: &str| u32::try_from(row.get::<i64, _>(name)).unwrap_or(0);

    MediaRecord {
        id: row.get("id"),
        url: row.get("url"),
        width: dimension("width"),
        height: dimension("height"),
        alt: row.get("alt"),
    }
}
