//! Error types.
//!
//! None of these ever cross a widget boundary as a panic. Widgets degrade to
//! rendered error text or emitted events; these types surface only from the
//! explicit fallible APIs (tree loading, form reset, the declarative builder).

use thiserror::Error;

/// Failure reported by a field validator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("validator failed: {message}")]
pub struct ValidatorError {
    /// What went wrong
    pub message: String,
}

impl ValidatorError {
    /// Create a new validator error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ValidatorError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidatorError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors returned when resolving a tree load request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The request was already resolved once.
    #[error("load request for node '{0}' was already resolved")]
    AlreadyResolved(String),

    /// A newer request (or a cancel) superseded this one.
    #[error("load request for node '{id}' is stale (generation {generation}, current {current})")]
    Stale {
        /// The node the request was issued for.
        id: String,
        /// Generation carried by the request.
        generation: u64,
        /// Generation currently expected by the tree.
        current: u64,
    },

    /// The node no longer exists in the tree.
    #[error("tree node '{0}' not found")]
    UnknownNode(String),

    /// The tree that issued the request has been dropped.
    #[error("tree for node '{0}' no longer exists")]
    Detached(String),

    /// The host failed to fetch the children.
    #[error("loading children of '{id}' failed: {message}")]
    Failed {
        /// The node being loaded.
        id: String,
        /// Failure description from the host.
        message: String,
    },
}

/// A control could not be reset to its baseline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResetError {
    /// The reset target is not something this control knows how to reset.
    #[error("control '{control}' has an unexpected reset target: {detail}")]
    UnexpectedTarget {
        /// Control id
        control: String,
        /// Description of the target
        detail: String,
    },
}

/// Errors from the declarative builder.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The description could not be parsed.
    #[error("invalid widget description: {0}")]
    Parse(#[from] serde_json::Error),

    /// An attribute value could not be converted.
    #[error("attribute '{name}' has invalid value '{value}'")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// Raw attribute value
        value: String,
    },

    /// Two widgets in one build share an explicit id.
    #[error("duplicate widget id '{0}'")]
    DuplicateId(String),

    /// A tree description contains the same node id twice.
    #[error("duplicate tree node id '{0}'")]
    DuplicateNode(String),

    /// A validator rule name is not known.
    #[error("unknown validation rule '{0}'")]
    UnknownRule(String),
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can carry either `&str` or `String` payloads; anything else gets a
/// generic message.
pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
