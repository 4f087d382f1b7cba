//! Test-only writers standing in for the CMS that owns the content store.

use chrono::{Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{ContentType, Taxonomy};

/// A post row to insert, with defaults for everything but identity.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: i64,
    pub kind: ContentType,
    pub status: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published_at: String,
    pub author_id: i64,
    pub featured_media_id: Option<i64>,
    pub fields: Option<String>,
}

impl NewPost {
    /// Post `n` of a type; higher numbers are published later. Author 1.
    pub fn numbered(kind: ContentType, n: i64) -> Self {
        Self {
            id: n,
            kind,
            status: "publish".to_string(),
            title: format!("{} {}", kind.as_str(), n),
            slug: format!("{}-{}", kind.as_str(), n),
            content: format!("<p>Body of {} {}</p>", kind.as_str(), n),
            excerpt: String::new(),
            published_at: (Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::hours(n))
            .to_rfc3339(),
            author_id: 1,
            featured_media_id: None,
            fields: default_fields(kind).map(str::to_string),
        }
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = slug.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn fields(mut self, fields: &str) -> Self {
        self.fields = Some(fields.to_string());
        self
    }

    pub fn media(mut self, media_id: i64) -> Self {
        self.featured_media_id = Some(media_id);
        self
    }
}

/// Minimal bags that satisfy each type's required fields.
fn default_fields(kind: ContentType) -> Option<&'static str> {
    match kind {
        ContentType::TeamMember => Some(r#"{"position": "Engineer"}"#),
        ContentType::Testimonial => Some(r#"{"author_name": "Client"}"#),
        _ => None,
    }
}

pub async fn insert_user(
    pool: &SqlitePool,
    id: i64,
    username: &str,
    email: &str,
    display_name: &str,
    password: &str,
) {
    let hash = bcrypt::hash(password, 4).unwrap();
    sqlx::query(
        "INSERT INTO users (id, username, email, display_name, description, password_hash) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(display_name)
    .bind(format!("About {}", display_name))
    .bind(hash)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_post(pool: &SqlitePool, post: NewPost) {
    sqlx::query(
        "INSERT INTO posts (id, post_type, status, title, slug, content, excerpt, published_at, author_id, featured_media_id, fields) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(post.id)
    .bind(post.kind.as_str())
    .bind(post.status)
    .bind(post.title)
    .bind(post.slug)
    .bind(post.content)
    .bind(post.excerpt)
    .bind(post.published_at)
    .bind(post.author_id)
    .bind(post.featured_media_id)
    .bind(post.fields)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_media(pool: &SqlitePool, id: i64, url: &str, width: i64, height: i64, alt: &str) {
    sqlx::query("INSERT INTO media (id, url, width, height, alt) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(url)
        .bind(width)
        .bind(height)
        .bind(alt)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_term(
    pool: &SqlitePool,
    id: i64,
    taxonomy: Taxonomy,
    name: &str,
    slug: &str,
    parent_id: Option<i64>,
) {
    sqlx::query("INSERT INTO terms (id, taxonomy, name, slug, parent_id) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(taxonomy.as_str())
        .bind(name)
        .bind(slug)
        .bind(parent_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn attach_term(pool: &SqlitePool, post_id: i64, term_id: i64) {
    sqlx::query("INSERT INTO post_terms (post_id, term_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(term_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_menu_location(pool: &SqlitePool, location: &str, menu_id: i64) {
    sqlx::query("INSERT INTO menu_locations (location, menu_id) VALUES (?, ?)")
        .bind(location)
        .bind(menu_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_menu_item(
    pool: &SqlitePool,
    menu_id: i64,
    id: i64,
    parent_id: i64,
    position: i64,
    title: &str,
    url: &str,
) {
    sqlx::query(
        "INSERT INTO menu_items (id, menu_id, parent_id, position, title, url) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(menu_id)
    .bind(parent_id)
    .bind(position)
    .bind(title)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_option(pool: &SqlitePool, name: &str, value: &str) {
    sqlx::query("INSERT OR REPLACE INTO options (name, value) VALUES (?, ?)")
        .bind(name)
        .bind(value)
        .execute(pool)
        .await
        .unwrap();
}
