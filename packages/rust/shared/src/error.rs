//! Error types for the Healthy Solutions Report tooling.
//!
//! Library crates use [`HealthReportError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all article pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum HealthReportError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored article could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// No article exists for the requested slug.
    #[error("article not found: {slug}")]
    NotFound { slug: String },

    /// Input validation error (bad email, bad URL, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Network/HTTP error talking to a third-party service.
    #[error("network error: {0}")]
    Network(String),

    /// The mailing-list provider rejected a subscription.
    #[error("subscription failed: {0}")]
    Subscription(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HealthReportError>;

impl HealthReportError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a not-found error for a slug.
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the article simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = HealthReportError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = HealthReportError::not_found("gut-health-tips");
        assert_eq!(err.to_string(), "article not found: gut-health-tips");
        assert!(err.is_not_found());

        let err = HealthReportError::validation("Invalid email address");
        assert!(err.to_string().contains("Invalid email"));
        assert!(!err.is_not_found());
    }
}
