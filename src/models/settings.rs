//! Site-wide settings read from the options table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ContentItem;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// The site settings singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_title: String,
    pub site_description: String,
    pub site_url: String,
    pub social_links: SocialLinks,
    pub contact_info: ContactInfo,
}

/// Homepage hero block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSection {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
}

/// Aggregated homepage payload.
#[derive(Debug, Clone, Serialize)]
pub struct HomepageData {
    pub featured_posts: Vec<ContentItem>,
    pub recent_projects: Vec<ContentItem>,
    pub testimonials: Vec<ContentItem>,
    pub hero_section: HeroSection,
}

/// Raw name/value pairs from the options table.
#[derive(Debug, Clone, Default)]
pub struct SiteOptions(pub HashMap<String, String>);

impl SiteOptions {
    /// Non-blank option value.
    pub fn get(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn site_title(&self) -> String {
        self.get("blogname").unwrap_or_default()
    }

    pub fn settings(&self, site_url: &str) -> SiteSettings {
        SiteSettings {
            site_title: self.site_title(),
            site_description: self.get("blogdescription").unwrap_or_default(),
            site_url: site_url.to_string(),
            social_links: SocialLinks {
                facebook: self.get("facebook_url"),
                twitter: self.get("twitter_url"),
                linkedin: self.get("linkedin_url"),
            },
            contact_info: ContactInfo {
                email: self.get("contact_email"),
                phone: self.get("contact_phone"),
            },
        }
    }

    pub fn hero(&self) -> HeroSection {
        HeroSection {
            title: self.get("hero_title"),
            subtitle: self.get("hero_subtitle"),
            cta_text: self.get("hero_cta_text"),
            cta_link: self.get("hero_cta_link"),
        }
    }
}
