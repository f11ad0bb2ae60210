//! Error taxonomy for the state core.
//!
//! Nothing here is fatal to a session: the coordinator turns every variant
//! into either a silent no-op or a short notice for the status bar.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An operation referenced a song or playlist that is no longer in the store.
    #[error("{what} `{id}` not found")]
    NotFound { what: &'static str, id: String },

    /// The playback or library backend rejected an operation.
    #[error("{operation} failed: {reason}")]
    TransientBackendFailure {
        operation: &'static str,
        reason: String,
    },

    /// A transport transition that is not valid from the current state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Ingested song has neither a native title nor an external track name.
    #[error("song `{id}` has neither a title nor an external track name")]
    MissingTitle { id: String },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn song_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            what: "song",
            id: id.into(),
        }
    }

    pub fn playlist_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            what: "playlist",
            id: id.into(),
        }
    }

    pub fn backend(operation: &'static str, error: &anyhow::Error) -> Self {
        Self::TransientBackendFailure {
            operation,
            reason: error.to_string(),
        }
    }

    /// Message shown to the user, or `None` for errors that stay silent.
    pub fn notice(&self) -> Option<String> {
        match self {
            CoreError::TransientBackendFailure { operation, reason } => {
                Some(format!("Could not {}: {}", operation, reason))
            }
            CoreError::MissingTitle { .. } => Some(self.to_string()),
            CoreError::NotFound { .. } | CoreError::InvalidTransition { .. } => None,
        }
    }
}
