//! A2UI error types.

use thiserror::Error;

/// Why a single inbound message (or one entry inside it) was dropped.
///
/// These never escape the processor; they are logged and the offending
/// piece is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MessageError {
    #[error("message is not a JSON object")]
    NotAnObject,

    #[error("`{tag}` body is not a JSON object")]
    BodyNotAnObject { tag: String },

    #[error("`{tag}` is missing a string `surfaceId`")]
    MissingSurfaceId { tag: String },

    #[error("component entry is missing a string `id`")]
    MissingComponentId,

    #[error("component `{id}` has no `component` object")]
    MissingComponentBody { id: String },

    #[error("data entry is missing a string `key`")]
    MissingDataKey,

    #[error("data entry `{key}` carries no recognised value")]
    MissingDataValue { key: String },

    #[error("invalid `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A failure contained at one component's render boundary.
///
/// The resolver turns every one of these into an error placeholder node
/// naming the component kind; siblings and ancestors keep rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("malformed {kind} properties: {reason}")]
    Malformed { kind: String, reason: String },

    #[error("component `{id}` references itself through its own subtree")]
    Cycle { id: String },

    #[error("nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("render budget of {limit} components exhausted")]
    BudgetExceeded { limit: usize },

    #[error("render primitive failed: {0}")]
    Primitive(String),

    #[error("panicked while rendering: {0}")]
    Panicked(String),
}

impl RenderError {
    /// Shorthand for host primitives reporting a failure.
    pub fn primitive(message: impl Into<String>) -> Self {
        RenderError::Primitive(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("config is not valid JSON: {0}")]
    Parse(String),
}
