//! User accounts and the summaries derived from them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const AVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// An account row; never serialized directly.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub description: String,
    pub password_hash: String,
}

/// Author block attached to every content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub description: String,
}

/// Identity returned by login and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl UserRecord {
    pub fn author_summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.display_name.clone(),
            avatar: avatar_url(&self.email),
            description: self.description.clone(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.display_name.clone(),
        }
    }
}

/// Gravatar URL keyed by the SHA-256 of the normalized email.
pub fn avatar_url(email: &str) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("{}/{}?s=96&d=mm", AVATAR_BASE, hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_normalizes_email() {
        let a = avatar_url("  Jane@Example.com ");
        let b = avatar_url("jane@example.com");

        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        // 64 hex chars between the base and the query string
        let hash = a
            .trim_start_matches("https://www.gravatar.com/avatar/")
            .split('?')
            .next()
            .unwrap();
        assert_eq!(hash.len(), 64);
    }
}
