//! Request DTOs for the gateway API
//!
//! Query strings and bodies accepted by the gateway. Query structs double as
//! the argument types of cached calls, so they are `Serialize` (forwarded to
//! the backend) as well as `Deserialize` (parsed from the gateway request).

use serde::{Deserialize, Serialize};

/// Maximum accepted length of an invalidation prefix
pub const MAX_PREFIX_LENGTH: usize = 256;

/// Filters for `GET /notifications`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Filters for `GET /courses`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Paging for review listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `GET /courses/:id?with_content=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CourseDetailQuery {
    #[serde(default)]
    pub with_content: bool,
}

/// `GET /courses/:id/related?limit=`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RelatedQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Body of `PUT /profile/preferences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    pub preferences: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /profile/password`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChangeRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.current_password.is_empty() || self.new_password.is_empty() {
            return Some("Both current and new password are required".to_string());
        }
        if self.current_password == self.new_password {
            return Some("New password must differ from the current one".to_string());
        }
        None
    }
}

/// Body of `POST /notifications/read`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub notification_ids: Vec<String>,
}

/// Body of `POST /courses/:id/reviews`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn validate(&self) -> Option<String> {
        if !(1..=5).contains(&self.rating) {
            return Some("Rating must be between 1 and 5".to_string());
        }
        None
    }
}

/// Body of `POST /cache/invalidate`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    pub prefix: String,
}

impl InvalidateRequest {
    pub fn validate(&self) -> Option<String> {
        if self.prefix.is_empty() {
            return Some(
                "Prefix cannot be empty; use DELETE /cache to clear everything".to_string(),
            );
        }
        if self.prefix.len() > MAX_PREFIX_LENGTH {
            return Some(format!(
                "Prefix exceeds maximum length of {} characters",
                MAX_PREFIX_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_query_skips_absent_params() {
        let query = CourseQuery {
            search: Some("rust".to_string()),
            ..CourseQuery::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "search": "rust" }));
    }

    #[test]
    fn test_password_validation() {
        let same = PasswordChangeRequest {
            current_password: "hunter2".to_string(),
            new_password: "hunter2".to_string(),
        };
        let empty = PasswordChangeRequest {
            current_password: "".to_string(),
            new_password: "x".to_string(),
        };
        let ok = PasswordChangeRequest {
            current_password: "old".to_string(),
            new_password: "new".to_string(),
        };
        assert!(same.validate().is_some());
        assert!(empty.validate().is_some());
        assert!(ok.validate().is_none());
    }

    #[test]
    fn test_review_rating_range() {
        let review = |rating| ReviewRequest {
            rating,
            comment: None,
        };
        assert!(review(0).validate().is_some());
        assert!(review(1).validate().is_none());
        assert!(review(5).validate().is_none());
        assert!(review(6).validate().is_some());
    }

    #[test]
    fn test_invalidate_request_validation() {
        let empty = InvalidateRequest {
            prefix: String::new(),
        };
        let long = InvalidateRequest {
            prefix: "x".repeat(MAX_PREFIX_LENGTH + 1),
        };
        let ok = InvalidateRequest {
            prefix: "user_".to_string(),
        };
        assert!(empty.validate().is_some());
        assert!(long.validate().is_some());
        assert!(ok.validate().is_none());
    }

    #[test]
    fn test_mark_read_deserialize() {
        let json = r#"{"notification_ids": ["n1", "n2"]}"#;
        let req: MarkReadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.notification_ids, vec!["n1", "n2"]);
    }
}
