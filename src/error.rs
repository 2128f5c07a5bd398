//! Error types for site planning

use thiserror::Error;

/// Errors that abort planning before anything reaches the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// Missing or invalid environment selection, or an invalid resolved config
    #[error("configuration error: {0}")]
    Config(String),

    /// No hosted zone exists for the site's domain
    #[error("no hosted zone found for domain '{domain}'")]
    ZoneNotFound { domain: String },

    /// Base and overlay disagree on the type of a field
    #[error("cannot merge '{path}': base is {base}, overlay is {overlay}")]
    MergeConflict {
        path: String,
        base: &'static str,
        overlay: &'static str,
    },

    /// The built plan violates an ordering invariant
    #[error("invalid plan: {0}")]
    Plan(#[from] declarative::Error),
}

impl SiteError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, SiteError>;
