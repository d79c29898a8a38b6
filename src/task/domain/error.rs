//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The owner identifier is empty or contains whitespace.
    #[error("invalid owner identifier '{0}', expected a non-empty token")]
    InvalidOwner(String),
}

/// Errors returned while validating engine configuration.
///
/// Configuration problems fail fast at construction so a misconfigured limit
/// can never silently disable cap enforcement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A WIP limit of zero would block every admission for that priority.
    #[error("WIP limit for {priority} must be at least 1")]
    ZeroWipLimit {
        /// Priority band the rejected limit applies to.
        priority: &'static str,
    },

    /// A retention threshold of zero days would archive same-day work.
    #[error("retention threshold must be at least 1 day")]
    ZeroRetention,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
