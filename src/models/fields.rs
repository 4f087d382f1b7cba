//! Custom-field bags, one variant per content type.
//!
//! The store keeps each bag as a JSON document. It is parsed into the variant matching the item's
//! content type and validated before it reaches a response.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::ContentType;

const DEFAULT_RATING: u8 = 5;

fn current_year() -> Option<i32> {
    Some(Utc::now().year())
}

/// Technologies selectable on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    WordPress,
    React,
    NextJs,
    Php,
    JavaScript,
    TypeScript,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResult {
    pub metric: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// Defaults to the current year when the bag leaves it out.
    #[serde(default = "current_year", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<Technology>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<GalleryImage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ProjectResult>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberFields {
    /// Required
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialProfiles>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialFields {
    /// Required
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// 1 to 5
    #[serde(default = "default_rating")]
    pub rating: u8,
}

fn default_rating() -> u8 {
    DEFAULT_RATING
}

impl Default for TestimonialFields {
    fn default() -> Self {
        Self {
            author_name: None,
            company: None,
            rating: DEFAULT_RATING,
        }
    }
}

/// Custom-field bag of a content item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomFields {
    Article(ArticleFields),
    Project(ProjectFields),
    TeamMember(TeamMemberFields),
    Testimonial(TestimonialFields),
}

/// A stored bag that does not match its content type's schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldsError {
    pub kind: ContentType,
    pub message: String,
}

impl std::fmt::Display for FieldsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} fields: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for FieldsError {}

impl CustomFields {
    /// Parse and validate the stored bag for a content type. A missing or empty bag yields the
    /// type's defaults, which still have to pass validation.
    pub fn parse(kind: ContentType, raw: Option<&str>) -> Result<Self, FieldsError> {
        let raw = match raw.map(str::trim) {
            None | Some("") | Some("null") => "{}",
            Some(raw) => raw,
        };

        let err = |e: serde_json::Error| FieldsError {
            kind,
            message: e.to_string(),
        };

        let fields = match kind {
            ContentType::Article => CustomFields::Article(serde_json::from_str(raw).map_err(err)?),
            ContentType::Project => CustomFields::Project(serde_json::from_str(raw).map_err(err)?),
            ContentType::TeamMember => {
                CustomFields::TeamMember(serde_json::from_str(raw).map_err(err)?)
            }
            ContentType::Testimonial => {
                CustomFields::Testimonial(serde_json::from_str(raw).map_err(err)?)
            }
        };

        fields.validate()?;
        Ok(fields)
    }

    pub fn kind(&self) -> ContentType {
        match self {
            CustomFields::Article(_) => ContentType::Article,
            CustomFields::Project(_) => ContentType::Project,
            CustomFields::TeamMember(_) => ContentType::TeamMember,
            CustomFields::Testimonial(_) => ContentType::Testimonial,
        }
    }

    fn validate(&self) -> Result<(), FieldsError> {
        let fail = |message: &str| {
            Err(FieldsError {
                kind: self.kind(),
                message: message.to_string(),
            })
        };

        match self {
            CustomFields::TeamMember(f) if is_blank(&f.position) => fail("position is required"),
            CustomFields::Testimonial(f) if is_blank(&f.author_name) => {
                fail("author_name is required")
            }
            CustomFields::Testimonial(f) if !(1..=5).contains(&f.rating) => {
                fail("rating must be between 1 and 5")
            }
            _ => Ok(()),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_fields_parse() {
        let raw = r#"{
            "client": "Acme",
            "year": 2023,
            "featured": true,
            "technologies": ["nextjs", "typescript"],
            "results": [{"metric": "Load time", "value": "-40%"}]
        }"#;

        let fields = CustomFields::parse(ContentType::Project, Some(raw)).unwrap();
        let CustomFields::Project(project) = &fields else {
            panic!("expected project fields");
        };

        assert_eq!(project.client.as_deref(), Some("Acme"));
        assert_eq!(
            project.technologies,
            Some(vec![Technology::NextJs, Technology::TypeScript])
        );
        assert_eq!(project.results.as_ref().unwrap()[0].value, "-40%");
        assert_eq!(project.featured, Some(true));
        assert_eq!(project.year, Some(2023));
    }

    #[test]
    fn test_project_year_defaults_to_current() {
        let fields = CustomFields::parse(ContentType::Project, Some(r#"{"client": "Acme"}"#)).unwrap();
        let CustomFields::Project(project) = fields else {
            panic!("expected project fields");
        };
        assert_eq!(project.year, Some(Utc::now().year()));

        let explicit = CustomFields::parse(ContentType::Project, Some(r#"{"year": null}"#)).unwrap();
        let CustomFields::Project(project) = explicit else {
            panic!("expected project fields");
        };
        assert_eq!(project.year, None);
    }

    #[test]
    fn test_missing_bag_uses_defaults() {
        let fields = CustomFields::parse(ContentType::Article, None).unwrap();
        assert_eq!(fields, CustomFields::Article(ArticleFields::default()));

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_unknown_technology_rejected() {
        let err = CustomFields::parse(ContentType::Project, Some(r#"{"technologies":["cobol"]}"#))
            .unwrap_err();
        assert_eq!(err.kind, ContentType::Project);
    }

    #[test]
    fn test_team_member_requires_position() {
        let err = CustomFields::parse(ContentType::TeamMember, Some(r#"{"email":"a@b.co"}"#))
            .unwrap_err();
        assert!(err.message.contains("position"));

        let ok = CustomFields::parse(
            ContentType::TeamMember,
            Some(r#"{"position":"Engineer","social_links":{"github":"https://github.com/x"}}"#),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_testimonial_rating() {
        let fields =
            CustomFields::parse(ContentType::Testimonial, Some(r#"{"author_name":"Ana"}"#)).unwrap();
        let CustomFields::Testimonial(t) = fields else {
            panic!("expected testimonial fields");
        };
        assert_eq!(t.rating, 5);

        let err = CustomFields::parse(
            ContentType::Testimonial,
            Some(r#"{"author_name":"Ana","rating":9}"#),
        )
        .unwrap_err();
        assert!(err.message.contains("rating"));
    }
}
