//! Unified application error types for the catalog.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Business-rule violations (depth,
//! dependents, unsupported kinds) are ordinary error kinds, never panics.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested folder or media asset was not found.
    NotFound,
    /// Input validation failed (blank name, malformed identifier, ...).
    Validation,
    /// Creating the folder would exceed the maximum tree depth.
    MaxDepthExceeded,
    /// The folder still has child folders.
    HasChildren,
    /// The folder still owns media assets.
    HasMedia,
    /// The upload kind is not one of the supported media kinds.
    UnsupportedKind,
    /// The uploaded content was empty.
    EmptyContent,
    /// The uploaded content exceeded the configured size limit.
    PayloadTooLarge,
    /// A uniqueness constraint was violated.
    Conflict,
    /// The object store is not configured or a call to it failed.
    StorageUnavailable,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::MaxDepthExceeded => write!(f, "MAX_DEPTH_EXCEEDED"),
            Self::HasChildren => write!(f, "HAS_CHILDREN"),
            Self::HasMedia => write!(f, "HAS_MEDIA"),
            Self::UnsupportedKind => write!(f, "UNSUPPORTED_KIND"),
            Self::EmptyContent => write!(f, "EMPTY_CONTENT"),
            Self::PayloadTooLarge => write!(f, "PAYLOAD_TOO_LARGE"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::StorageUnavailable => write!(f, "STORAGE_UNAVAILABLE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout the catalog.
///
/// Besides the optional underlying cause, an error may carry a second
/// `AppError` describing a failed compensating action (for example the
/// object-store delete attempted after a metadata insert failed). The
/// primary kind and message always describe the original failure.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    /// Failure of a compensating action attempted after this error.
    pub rollback: Option<Box<AppError>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            rollback: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
            rollback: None,
        }
    }

    /// Attach the failure of a compensating action to this error.
    pub fn with_rollback_failure(mut self, rollback: AppError) -> Self {
        self.rollback = Some(Box::new(rollback));
        self
    }

    /// The failure of the compensating action, if one was attempted and failed.
    pub fn rollback_error(&self) -> Option<&AppError> {
        self.rollback.as_deref()
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a max-depth error.
    pub fn max_depth_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MaxDepthExceeded, message)
    }

    /// Create a has-children error.
    pub fn has_children(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HasChildren, message)
    }

    /// Create a has-media error.
    pub fn has_media(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HasMedia, message)
    }

    /// Create an unsupported-kind error.
    pub fn unsupported_kind(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedKind, message)
    }

    /// Create an empty-content error.
    pub fn empty_content(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyContent, message)
    }

    /// Create a payload-too-large error.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a storage-unavailable error.
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorageUnavailable, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
            rollback: self.rollback.clone(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
