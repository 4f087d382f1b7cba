//! Content item models.

use serde::{Deserialize, Serialize};

use super::{AuthorSummary, CustomFields, MediaVariantSet};

/// The content types served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Project,
    TeamMember,
    Testimonial,
}

impl ContentType {
    /// Types covered by the global search endpoint.
    pub const SEARCHABLE: [ContentType; 3] = [
        ContentType::Article,
        ContentType::Project,
        ContentType::TeamMember,
    ];

    /// Name used in the content store and in responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Project => "project",
            ContentType::TeamMember => "team_member",
            ContentType::Testimonial => "testimonial",
        }
    }

    /// Parse a store name or a route segment (singular or REST base).
    pub fn from_segment(s: &str) -> Option<Self> {
        match s {
            "article" | "articles" | "post" | "posts" => Some(ContentType::Article),
            "project" | "projects" => Some(ContentType::Project),
            "team_member" | "team-member" | "team" => Some(ContentType::TeamMember),
            "testimonial" | "testimonials" => Some(ContentType::Testimonial),
            _ => None,
        }
    }
}

/// A published row from the content store, before response shaping.
#[derive(Debug, Clone)]
pub struct ContentRecord {
    pub id: i64,
    pub kind: ContentType,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub date: String,
    pub author_id: i64,
    pub featured_media_id: Option<i64>,
    /// Raw JSON custom-field bag as stored
    pub fields: Option<String>,
}

/// A content item as returned by every route.
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub date: String,
    pub author: i64,
    pub acf: CustomFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<MediaVariantSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_details: Option<AuthorSummary>,
}

/// Filter on a single custom field, compared as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFilter {
    pub key: String,
    pub value: String,
}

/// Query against the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub types: Vec<ContentType>,
    pub slug: Option<String>,
    pub meta: Option<MetaFilter>,
    /// 1-based page number
    pub page: u32,
    /// Page size; `None` returns every match
    pub per_page: Option<u32>,
}

impl ContentQuery {
    pub fn for_type(kind: ContentType) -> Self {
        Self::for_types(&[kind])
    }

    pub fn for_types(kinds: &[ContentType]) -> Self {
        Self {
            types: kinds.to_vec(),
            slug: None,
            meta: None,
            page: 1,
            per_page: None,
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Only items whose `featured` custom field is true.
    pub fn featured(mut self) -> Self {
        self.meta = Some(MetaFilter {
            key: "featured".to_string(),
            value: "1".to_string(),
        });
        self
    }

    pub fn paginate(mut self, page: u32, per_page: u32) -> Self {
        self.page = page.max(1);
        self.per_page = Some(per_page);
        self
    }

    pub fn limit(self, count: u32) -> Self {
        self.paginate(1, count)
    }

    /// Row offset of the requested page.
    pub fn offset(&self) -> i64 {
        match self.per_page {
            Some(per_page) => i64::from(self.page.saturating_sub(1)) * i64::from(per_page),
            None => 0,
        }
    }
}

/// One page of store results plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct ContentPage {
    pub records: Vec<ContentRecord>,
    pub total: i64,
}
