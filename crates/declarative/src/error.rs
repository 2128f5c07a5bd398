//! Error types for the declarative crate

use thiserror::Error;

/// Errors raised while assembling or validating an intent plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two intents share a logical id
    #[error("duplicate intent id: {0}")]
    DuplicateIntent(String),

    /// Intent depends on an id that is not (yet) in the plan
    #[error("intent '{intent}' depends on unknown intent '{dependency}'")]
    UnknownDependency { intent: String, dependency: String },

    /// Dependency graph contains a cycle
    #[error("dependency cycle detected at intent '{0}'")]
    Cycle(String),

    /// Properties reference an intent that is not a declared dependency
    #[error("intent '{intent}' references '{reference}' without depending on it")]
    UndeclaredReference { intent: String, reference: String },
}

/// Result type for plan operations
pub type Result<T> = std::result::Result<T, Error>;
