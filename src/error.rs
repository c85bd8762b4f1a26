//! Error types for the render-coalescing core.
//!
//! Nothing in this crate is a user-facing failure. These types exist so that
//! handler and filter-stage failures can be isolated, logged and reported
//! without destabilizing the interaction state machines.

use thiserror::Error;

use crate::events::SurfaceId;

/// Top-level error type for fallible crate operations.
#[derive(Debug, Error)]
pub enum FilterPaneError {
    /// Runtime configuration could not be loaded or applied.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The GPU filter stage failed to produce a frame.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A windowing-system object the adapter needs was not available.
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Problems with the runtime [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document did not parse.
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured log filter directive was rejected.
    #[error("invalid log filter '{directive}': {reason}")]
    LogFilter { directive: String, reason: String },
}

/// Failure reported by a single bus subscriber.
///
/// Handler failures never abort a dispatch; they are collected into the
/// [`DispatchReport`](crate::events::DispatchReport) of the publish that
/// triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler returned an error of its own.
    #[error("handler failed: {0}")]
    Failed(String),

    /// The handler panicked; the bus caught the unwind.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler was invoked again by a nested publish while it was
    /// still running.
    #[error("handler re-entered during its own dispatch")]
    Reentrant,
}

impl HandlerError {
    /// Convenience constructor for handler-side failures.
    pub fn failed(msg: impl Into<String>) -> Self {
        HandlerError::Failed(msg.into())
    }
}

/// Failure reported by the external filter stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The compute/present cycle failed inside the filter stage.
    #[error("filter stage failed: {0}")]
    Stage(String),

    /// The surface has a zero-sized drawable; the filter stage is not
    /// invoked for it.
    #[error("no drawable available for {0}")]
    DrawableUnavailable(SurfaceId),
}

/// A specialized `Result` type for crate operations.
pub type Result<T> = std::result::Result<T, FilterPaneError>;
