//! Taxonomy terms.

use serde::{Deserialize, Serialize};

use super::ContentType;

/// The taxonomies exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Category,
    PostTag,
    ProjectCategory,
    ProjectTag,
    Skill,
}

impl Taxonomy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Category => "category",
            Taxonomy::PostTag => "post_tag",
            Taxonomy::ProjectCategory => "project_category",
            Taxonomy::ProjectTag => "project_tag",
            Taxonomy::Skill => "skill",
        }
    }

    /// Parse a store name or a route segment.
    pub fn from_segment(s: &str) -> Option<Self> {
        match s {
            "category" | "categories" => Some(Taxonomy::Category),
            "post_tag" | "tags" => Some(Taxonomy::PostTag),
            "project_category" | "project-categories" => Some(Taxonomy::ProjectCategory),
            "project_tag" | "project-tags" => Some(Taxonomy::ProjectTag),
            "skill" | "skills" => Some(Taxonomy::Skill),
            _ => None,
        }
    }

    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Taxonomy::Category | Taxonomy::ProjectCategory)
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Taxonomy::Category | Taxonomy::PostTag => ContentType::Article,
            Taxonomy::ProjectCategory | Taxonomy::ProjectTag => ContentType::Project,
            Taxonomy::Skill => ContentType::TeamMember,
        }
    }
}

/// A taxonomy term with the number of published items it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub taxonomy: Taxonomy,
    pub name: String,
    pub slug: String,
    /// Only set on hierarchical taxonomies
    pub parent: Option<i64>,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_segments() {
        assert_eq!(
            Taxonomy::from_segment("project-categories"),
            Some(Taxonomy::ProjectCategory)
        );
        assert_eq!(Taxonomy::from_segment("skills"), Some(Taxonomy::Skill));
        assert_eq!(Taxonomy::from_segment("colors"), None);
        assert!(Taxonomy::ProjectCategory.is_hierarchical());
        assert!(!Taxonomy::ProjectTag.is_hierarchical());
        assert_eq!(Taxonomy::Skill.content_type(), ContentType::TeamMember);
    }
}
