//! Error types for powerwall-rs.

use thiserror::Error;

use crate::tracking::TrackingSource;

/// The main error type for powerwall-rs operations.
///
/// None of these are fatal to the host: callers log them and fall back to
/// manual control and a single-surface display.
#[derive(Error, Debug)]
pub enum PowerwallError {
    /// Invalid rig or control configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// More viewpoints were requested than output surfaces were detected.
    #[error("{requested} viewpoints requested but only {available} output surfaces detected")]
    TooManyViewpoints { requested: usize, available: usize },

    /// A collaborator with the given name is already registered.
    #[error("collaborator '{0}' already registered")]
    CollaboratorExists(String),

    /// A named external collaborator could not be found.
    #[error("collaborator '{0}' not found")]
    MissingCollaborator(String),

    /// The selected tracking source is not what the collaborator provides.
    #[error("tracking source {requested:?} unavailable (collaborator provides {available:?})")]
    UnsupportedSource {
        requested: TrackingSource,
        available: TrackingSource,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PowerwallError {
    /// Returns true for errors caused by invalid viewpoint or surface counts
    /// and other configuration values.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PowerwallError::Config(_) | PowerwallError::TooManyViewpoints { .. }
        )
    }
}

/// A specialized Result type for powerwall-rs operations.
pub type Result<T> = std::result::Result<T, PowerwallError>;
