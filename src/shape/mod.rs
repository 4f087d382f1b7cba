//! Response shaping pipeline.
//!
//! Every route returning content items passes its store records through [`shape_items`], so each
//! item carries its custom-field bag, featured image variants and author summary.

use std::collections::{BTreeSet, HashMap};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    ContentItem, ContentRecord, CustomFields, MediaRecord, MediaVariantSet, UserRecord,
};

/// Shape a batch of records, loading their authors and media in two queries.
pub async fn shape_items(
    repo: &Repository,
    records: Vec<ContentRecord>,
) -> Result<Vec<ContentItem>, AppError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids: Vec<i64> = records
        .iter()
        .map(|r| r.author_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let media_ids: Vec<i64> = records
        .iter()
        .filter_map(|r| r.featured_media_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let (authors, media) = tokio::try_join!(
        repo.authors_by_ids(&author_ids),
        repo.media_by_ids(&media_ids)
    )?;

    records
        .into_iter()
        .map(|record| shape_item(record, &authors, &media))
        .collect()
}

/// Shape one record against preloaded authors and media.
pub fn shape_item(
    record: ContentRecord,
    authors: &HashMap<i64, UserRecord>,
    media: &HashMap<i64, MediaRecord>,
) -> Result<ContentItem, AppError> {
    let acf = CustomFields::parse(record.kind, record.fields.as_deref()).map_err(|e| {
        tracing::error!("Item {} has {}", record.id, e);
        AppError::Database(format!("Item {} has {}", record.id, e))
    })?;

    let image = record.featured_media_id.and_then(|id| media.get(&id));
    let author_details = authors.get(&record.author_id).map(UserRecord::author_summary);

    Ok(ContentItem {
        id: record.id,
        kind: record.kind,
        title: record.title,
        slug: record.slug,
        content: record.content,
        excerpt: record.excerpt,
        date: record.date,
        author: record.author_id,
        acf,
        featured_image: image.map(MediaVariantSet::from_original),
        featured_image_alt: image.and_then(|m| m.alt.clone()),
        author_details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    fn record(kind: ContentType, fields: Option<&str>) -> ContentRecord {
        ContentRecord {
            id: 7,
            kind,
            title: "Title".to_string(),
            slug: "title".to_string(),
            content: "<p>Body</p>".to_string(),
            excerpt: String::new(),
            date: "2024-01-01T00:00:00+00:00".to_string(),
            author_id: 1,
            featured_media_id: Some(3),
            fields: fields.map(str::to_string),
        }
    }

    fn author() -> UserRecord {
        UserRecord {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            description: "Writer".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_shape_attaches_everything() {
        let authors = HashMap::from([(1, author())]);
        let media = HashMap::from([(
            3,
            MediaRecord {
                id: 3,
                url: "/uploads/cover.jpg".to_string(),
                width: 1600,
                height: 900,
                alt: Some("Cover".to_string()),
            },
        )]);

        let item = shape_item(
            record(ContentType::Project, Some(r#"{"client":"Acme"}"#)),
            &authors,
            &media,
        )
        .unwrap();

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "project");
        assert_eq!(json["acf"]["client"], "Acme");
        assert_eq!(json["featured_image"]["medium"]["width"], 300);
        assert_eq!(json["featured_image_alt"], "Cover");
        assert_eq!(json["author_details"]["name"], "Ana");
        assert_eq!(json["author_details"]["description"], "Writer");
    }

    #[test]
    fn test_shape_without_media_or_author() {
        let item = shape_item(
            record(ContentType::Article, None),
            &HashMap::new(),
            &HashMap::new(),
        )
        .unwrap();

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("featured_image").is_none());
        assert!(json.get("author_details").is_none());
        assert_eq!(json["acf"], serde_json::json!({}));
    }

    #[test]
    fn test_shape_rejects_invalid_bag() {
        let err = shape_item(
            record(ContentType::TeamMember, Some("{}")),
            &HashMap::new(),
            &HashMap::new(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), crate::errors::codes::DATABASE_ERROR);
    }
}
