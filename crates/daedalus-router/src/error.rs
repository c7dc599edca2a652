//! Insertion errors.

use http::Method;
use thiserror::Error;

/// Reasons a route could not be inserted into a [`Router`](crate::Router).
///
/// Conflicts hand the rejected value back so the caller can decide what to do
/// with it; the router itself keeps the first registration.
#[derive(Debug, Error)]
pub enum InsertError<T> {
    /// The method is already registered on this path template.
    #[error("route {method} {path} is already registered")]
    Conflict {
        /// HTTP method of the rejected route
        method: Method,
        /// Normalized path template
        path: String,
        /// The value that was not inserted
        value: T,
    },

    /// A parameter segment uses a different name than an existing route at
    /// the same position, e.g. `/a/{id}` followed by `/a/{key}/b`.
    #[error("parameter {{{found}}} in {path} conflicts with existing parameter {{{existing}}}")]
    ParamConflict {
        /// Path template being inserted
        path: String,
        /// Name already bound at this position
        existing: String,
        /// Name used by the rejected route
        found: String,
        /// The value that was not inserted
        value: T,
    },

    /// The path template is malformed.
    #[error("invalid path template {path}: {reason}")]
    InvalidPath {
        /// Path template being inserted
        path: String,
        /// What is wrong with it
        reason: String,
        /// The value that was not inserted
        value: T,
    },
}

impl<T> InsertError<T> {
    /// Returns the rejected value.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Conflict { value, .. }
            | Self::ParamConflict { value, .. }
            | Self::InvalidPath { value, .. } => Some(value),
        }
    }

    /// Returns true for a duplicate `(method, path)` registration.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
