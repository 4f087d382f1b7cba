//! Contact form endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::notify::Notification;
use crate::AppState;

const THANK_YOU: &str = "Thank you! We will get back to you soon.";

/// Contact form submission. Fields are optional here so a missing one is reported like a blank one.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Acknowledgement returned once the notification is out.
#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub success: bool,
    pub message: &'static str,
}

impl IntoResponse for ContactReceipt {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Submission {
    name: String,
    email: String,
    message: String,
}

fn required(param: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::invalid_param(param, "is required"))
}

impl ContactRequest {
    fn validate(self) -> Result<Submission, AppError> {
        let name = required("name", self.name)?;
        let email = required("email", self.email)?;
        if !is_valid_email(&email) {
            return Err(AppError::invalid_param("email", "must be a valid email address"));
        }
        let message = required("message", self.message)?;

        Ok(Submission {
            name,
            email,
            message,
        })
    }
}

/// One `@`, a non-empty local part, and a dotted domain without empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// POST /contact - Validate a submission and notify the site administrator.
pub async fn submit_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<ContactReceipt, AppError> {
    let Json(request) = body?;
    let submission = request.validate()?;

    let options = state.repo.load_options().await?;
    let notification = Notification {
        to: state.config.admin_email.clone(),
        subject: format!("[{}] Contact Form", options.site_title()),
        body: format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}",
            submission.name, submission.email, submission.message
        ),
        reply_to: submission.email,
    };

    if let Err(e) = state.notifier.send(&notification).await {
        tracing::warn!("Contact notification failed: {}", e);
        return Err(AppError::Delivery("Failed to send message".to_string()));
    }

    Ok(ContactReceipt {
        success: true,
        message: THANK_YOU,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));

        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email("ana@example..com"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana@example."));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana smith@example.com"));
    }

    #[test]
    fn test_validation_reports_first_bad_field() {
        let err = ContactRequest {
            name: Some("  ".to_string()),
            email: Some("bad".to_string()),
            message: None,
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidParam { ref param, .. } if param == "name"));

        let err = ContactRequest {
            name: Some("Ana".to_string()),
            email: Some("bad".to_string()),
            message: Some("Hi".to_string()),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidParam { ref param, .. } if param == "email"));
    }

    #[test]
    fn test_validation_trims_fields() {
        let submission = ContactRequest {
            name: Some(" Ana ".to_string()),
            email: Some("ana@example.com".to_string()),
            message: Some("\nHello\n".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(submission.name, "Ana");
        assert_eq!(submission.message, "Hello");
    }
}
