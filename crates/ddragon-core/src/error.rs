//! Error types for the Data Dragon mirror.
//!
//! All fatal failures propagate unmodified to the caller; the only
//! internally-absorbed failure is a hard-link attempt falling back to a
//! full write (see `store::hard_link`).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mirror operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// An upstream HTTP GET failed. Non-2xx statuses and transport errors
    /// both land here so callers never have to distinguish them.
    #[error("GET {url} failed: {message}")]
    Fetch {
        url: String,
        /// HTTP status, when the request got far enough to receive one.
        status: Option<u16>,
        message: String,
    },

    /// A cached file exists on disk but could not be read. This is fatal
    /// and never treated as a cache miss.
    #[error("unreadable cached file {path}: {message}")]
    Read {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// JSON content (from cache or upstream) failed to parse or had an
    /// unexpected shape.
    #[error("invalid JSON for {context}: {message}")]
    Decode {
        context: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// No entity matched the requested key.
    #[error("no {resource} entry \"{key}\" for version {version} ({language})")]
    NotFound {
        resource: String,
        key: String,
        version: String,
        language: String,
    },

    /// Search query length outside the accepted bounds.
    #[error("invalid search query \"{query}\": length must be within [{min}, {max}] characters")]
    InvalidQuery {
        query: String,
        min: usize,
        max: usize,
    },

    /// A request parameter failed syntactic validation.
    #[error("invalid {param}: \"{value}\"")]
    InvalidParam { param: String, value: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for mirror operations.
pub type Result<T> = std::result::Result<T, MirrorError>;

impl From<std::io::Error> for MirrorError {
    fn from(err: std::io::Error) -> Self {
        MirrorError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MirrorError {
    fn from(err: serde_json::Error) -> Self {
        MirrorError::Decode {
            context: "json".to_string(),
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl MirrorError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        MirrorError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// True when the failure came from the upstream CDN rather than the
    /// local store. Collaborators use this to pick a user-facing message.
    pub fn is_upstream(&self) -> bool {
        matches!(self, MirrorError::Fetch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_carries_context() {
        let err = MirrorError::NotFound {
            resource: "champion".into(),
            key: "Aatrox".into(),
            version: "15.1.1".into(),
            language: "fr_FR".into(),
        };
        assert_eq!(
            err.to_string(),
            "no champion entry \"Aatrox\" for version 15.1.1 (fr_FR)"
        );
    }

    #[test]
    fn test_fetch_is_upstream() {
        let err = MirrorError::Fetch {
            url: "https://example.test/x".into(),
            status: Some(500),
            message: "upstream returned 500".into(),
        };
        assert!(err.is_upstream());
        assert!(!MirrorError::Config {
            message: "x".into()
        }
        .is_upstream());
    }
}
