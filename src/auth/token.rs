//! Stateless HS256 bearer tokens.
//!
//! A token is `header.payload.signature`, each segment URL-safe base64 without padding, with the
//! signature an HMAC-SHA256 over `header.payload`. Validity depends only on the signature and the
//! expiry; nothing is stored server-side.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Tokens expire exactly seven days after issuance.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60 * 24 * 7;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Header {
    typ: String,
    alg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub user: TokenUser,
}

/// Claims carried in the payload segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub data: TokenData,
}

impl Claims {
    /// The user the token was issued to.
    pub fn subject(&self) -> i64 {
        self.data.user.id
    }
}

/// Why a token could not be issued or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// No signing secret configured
    MissingSecret,
    /// Not three segments, bad base64 or bad JSON
    Malformed,
    /// Signature does not match
    BadSignature,
    /// `now >= exp`
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            TokenError::MissingSecret => "signing secret is not configured",
            TokenError::Malformed => "malformed token",
            TokenError::BadSignature => "signature mismatch",
            TokenError::Expired => "token expired",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies tokens with the server secret.
pub struct TokenSigner {
    secret: Option<Vec<u8>>,
    issuer: String,
}

impl TokenSigner {
    pub fn new(secret: Option<&str>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
            issuer: issuer.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Issue a token for `user_id`, valid for seven days from now.
    pub fn issue(&self, user_id: i64) -> Result<(String, Claims), TokenError> {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: i64, now: i64) -> Result<(String, Claims), TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::MissingSecret)?;

        let claims = Claims {
            iss: self.issuer.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
            data: TokenData {
                user: TokenUser { id: user_id },
            },
        };

        let header = Header {
            typ: "JWT".to_string(),
            alg: ALGORITHM.to_string(),
        };

        let header = encode_segment(&header)?;
        let payload = encode_segment(&claims)?;
        let signing_input = format!("{}.{}", header, payload);
        let signature = URL_SAFE_NO_PAD.encode(sign(secret, &signing_input)?);

        Ok((format!("{}.{}", signing_input, signature), claims))
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let secret = self.secret.as_deref().ok_or(TokenError::MissingSecret)?;

        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let supplied = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let expected = sign(secret, &format!("{}.{}", header, payload))?;

        if !bool::from(expected.as_slice().ct_eq(supplied.as_slice())) {
            return Err(TokenError::BadSignature);
        }

        let header: Header = decode_segment(header)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let claims: Claims = decode_segment(payload)?;
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn sign(secret: &[u8], signing_input: &str) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::MissingSecret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|_| TokenError::Malformed)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn signer() -> TokenSigner {
        TokenSigner::new(Some("test-secret"), "https://site.example")
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let (token, claims) = signer.issue_at(42, NOW).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECS);

        let verified = signer.verify_at(&token, NOW + 60).unwrap();
        assert_eq!(verified, claims);
        assert_eq!(verified.subject(), 42);
        assert_eq!(verified.iss, "https://site.example");
    }

    #[test]
    fn test_expiry_boundary() {
        let signer = signer();
        let (token, _) = signer.issue_at(1, NOW).unwrap();

        let last_valid = NOW + TOKEN_LIFETIME_SECS - 1;
        assert!(signer.verify_at(&token, last_valid).is_ok());
        assert_eq!(
            signer.verify_at(&token, NOW + TOKEN_LIFETIME_SECS),
            Err(TokenError::Expired)
        );
        assert_eq!(
            signer.verify_at(&token, NOW + TOKEN_LIFETIME_SECS + 3600),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let (token, _) = signer.issue_at(1, NOW).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        for i in 0..parts[1].len() {
            let mut payload = parts[1].as_bytes().to_vec();
            payload[i] = if payload[i] == b'A' { b'B' } else { b'A' };
            let forged = format!(
                "{}.{}.{}",
                parts[0],
                String::from_utf8(payload).unwrap(),
                parts[2]
            );
            assert!(signer.verify_at(&forged, NOW).is_err(), "byte {} accepted", i);
        }
    }

    #[test]
    fn test_forged_subject_rejected() {
        let signer = signer();
        let (token, mut claims) = signer.issue_at(1, NOW).unwrap();
        claims.data.user.id = 2;

        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            encode_segment(&claims).unwrap(),
            parts[2]
        );
        assert_eq!(signer.verify_at(&forged, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_segment_count_enforced() {
        let signer = signer();
        let (token, _) = signer.issue_at(1, NOW).unwrap();

        assert_eq!(signer.verify_at("abc.def", NOW), Err(TokenError::Malformed));
        assert_eq!(
            signer.verify_at(&format!("{}.extra", token), NOW),
            Err(TokenError::Malformed)
        );
        assert_eq!(signer.verify_at("", NOW), Err(TokenError::Malformed));
    }

    #[test]
    fn test_other_secret_rejected() {
        let (token, _) = signer().issue_at(1, NOW).unwrap();
        let other = TokenSigner::new(Some("another-secret"), "https://site.example");
        assert_eq!(other.verify_at(&token, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let signer = TokenSigner::new(None, "https://site.example");
        assert!(!signer.is_configured());
        assert_eq!(signer.issue_at(1, NOW), Err(TokenError::MissingSecret));

        let (token, _) = self::signer().issue_at(1, NOW).unwrap();
        assert_eq!(signer.verify_at(&token, NOW), Err(TokenError::MissingSecret));

        assert!(!TokenSigner::new(Some(""), "x").is_configured());
    }
}
