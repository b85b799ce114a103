//! Error taxonomy shared by the services and the session.
//!
//! A search with no hits is not an error: lookups return `Ok(None)` or an
//! empty `Vec`. Everything else that can go wrong falls into one of the
//! enums below.

use std::time::Duration;

use crate::settings::SettingsError;

/// Failure reported by a lookup or analysis backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("backend failure: {0}")]
    Backend(String),

    #[error("credential rejected by the analysis service")]
    InvalidCredential,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

/// Caller-side validation failure, raised before any service is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no API key configured; set one with `blueline init --api-key <KEY>` or BLUELINE_API_KEY")]
    MissingCredential,

    #[error("search term is empty")]
    EmptySearchTerm,

    #[error("no plan selected; run a search first")]
    NoPlanSelected,
}

/// Any failure surfaced by a [`crate::session::Session`] operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("failed to persist settings: {0}")]
    Settings(#[from] SettingsError),
}

impl SessionError {
    /// Whether retrying the same action could succeed without the user
    /// changing anything first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Service(
                ServiceError::Transport(_) | ServiceError::Backend(_) | ServiceError::Timeout(_)
            )
        )
    }
}
