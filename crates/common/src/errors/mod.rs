//! Error types for StaffDesk
//!
//! Provides a single error taxonomy for the console with:
//! - Distinct error types for validation, remote, and editor failures
//! - Machine-readable error codes
//! - Best-effort extraction of user-visible messages from error bodies

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidFieldValue,
    UnknownField,

    // Editor state errors (3xxx)
    SubmitInFlight,
    ModalClosed,
    NoParentLoaded,
    TabUnavailable,
    ActionUnavailable,

    // Resource errors (4xxx)
    NotFound,
    RecordNotFound,

    // Remote errors (8xxx)
    UpstreamError,
    TransportError,
    Timeout,
    EmptyResponse,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidFieldValue => 1002,
            ErrorCode::UnknownField => 1003,

            // Editor state (3xxx)
            ErrorCode::SubmitInFlight => 3001,
            ErrorCode::ModalClosed => 3002,
            ErrorCode::NoParentLoaded => 3003,
            ErrorCode::TabUnavailable => 3004,
            ErrorCode::ActionUnavailable => 3005,

            // Resources (4xxx)
            ErrorCode::NotFound => 4001,
            ErrorCode::RecordNotFound => 4002,

            // Remote (8xxx)
            ErrorCode::UpstreamError => 8001,
            ErrorCode::TransportError => 8002,
            ErrorCode::Timeout => 8003,
            ErrorCode::EmptyResponse => 8004,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Field name to message map produced by client-side validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field. The first message recorded for a field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors in, keeping messages already present
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// Turn a non-empty error set into an `AppError::Validation`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation { errors: self })
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", field));
            out.insert(field.to_string(), message);
        }
        out
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed on {} field(s)", .errors.len())]
    Validation { errors: FieldErrors },

    #[error("Invalid value for field {field}: {message}")]
    InvalidFieldValue { field: String, message: String },

    #[error("Unknown form field: {field}")]
    UnknownField { field: String },

    // Editor state errors
    #[error("A {kind} submission is already in flight")]
    SubmitInFlight { kind: String },

    #[error("The {kind} form is not open")]
    ModalClosed { kind: String },

    #[error("No parent record is loaded")]
    NoParentLoaded,

    #[error("Tab {tab} is not available for {entity}")]
    TabUnavailable { tab: String, entity: String },

    #[error("Cannot {action} a {kind}")]
    ActionUnavailable { action: String, kind: String },

    // Resource errors
    #[error("Resource not found: {resource} with id {id}")]
    NotFound { resource: String, id: i64 },

    #[error("No {kind} with id {id} in the current record")]
    RecordNotFound { kind: String, id: i64 },

    // Remote errors
    #[error("API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Empty response from {resource}")]
    EmptyResponse { resource: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidFieldValue { .. } => ErrorCode::InvalidFieldValue,
            AppError::UnknownField { .. } => ErrorCode::UnknownField,
            AppError::SubmitInFlight { .. } => ErrorCode::SubmitInFlight,
            AppError::ModalClosed { .. } => ErrorCode::ModalClosed,
            AppError::NoParentLoaded => ErrorCode::NoParentLoaded,
            AppError::TabUnavailable { .. } => ErrorCode::TabUnavailable,
            AppError::ActionUnavailable { .. } => ErrorCode::ActionUnavailable,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            AppError::Api { status: 404, .. } => ErrorCode::NotFound,
            AppError::Api { .. } => ErrorCode::UpstreamError,
            AppError::Transport(_) => ErrorCode::TransportError,
            AppError::Timeout { .. } => ErrorCode::Timeout,
            AppError::EmptyResponse { .. } => ErrorCode::EmptyResponse,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Check if this error came back from (or on the way to) the backend
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::Api { .. }
                | AppError::Transport(_)
                | AppError::Timeout { .. }
                | AppError::EmptyResponse { .. }
        )
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation { errors } => Some(errors),
            _ => None,
        }
    }

    /// Text for a toast: the backend's own message when it sent one,
    /// otherwise the caller's fallback
    pub fn toast_text(&self, fallback: &str) -> String {
        match self {
            AppError::Api { message: Some(message), .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pull a user-visible message out of an error body: `detail`, then `message`
pub fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| {
        body.get(*key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::RecordNotFound { kind: "contact".into(), id: 4 };
        assert_eq!(err.code(), ErrorCode::RecordNotFound);
        assert_eq!(err.code().as_code(), 4002);

        let err = AppError::Api { status: 404, message: None };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.is_remote());
    }

    #[test]
    fn test_message_extraction_prefers_detail() {
        let body = json!({"detail": "Not allowed", "message": "ignored"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("Not allowed"));

        let body = json!({"message": "Email already used"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("Email already used"));

        let body = json!({"email": ["This field is required."]});
        assert_eq!(extract_error_message(&body), None);
        assert_eq!(extract_error_message(&json!("plain")), None);
    }

    #[test]
    fn test_toast_text_falls_back() {
        let err = AppError::Api { status: 400, message: Some("Bad city".into()) };
        assert_eq!(err.toast_text("Failed to add location"), "Bad city");

        let err = AppError::Timeout { timeout_ms: 30_000 };
        assert_eq!(err.toast_text("Failed to add location"), "Failed to add location");
    }

    #[test]
    fn test_field_errors_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("email", "Enter a valid email address");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.len(), 1);

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(!err.is_remote());
        assert!(err.field_errors().is_some());
    }
}
