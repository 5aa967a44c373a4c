//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the lookup, collection and entitlement layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("sign-in required")]
    AuthRequired,

    #[error("word not found: {word}")]
    NotFound { word: String },

    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("remote call failed: {0}")]
    RemoteFailure(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session closed before the result arrived")]
    Discarded,
}

impl CoreError {
    /// Banner text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Please sign in to continue.",
            Self::NotFound { .. } => "Word not found. Please try another word.",
            Self::LookupFailed(_) => "Failed to look up word. Please try again.",
            Self::RemoteFailure(_) => "Something went wrong. Please try again.",
            Self::InvalidInput(_) => "Please check your input and try again.",
            Self::Discarded => "Your session has ended. Please sign in again.",
        }
    }
}

/// Flashcard drill phase violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no words to practice")]
    EmptyCollection,

    #[error("drill has not been started")]
    NotStarted,

    #[error("drill is closed")]
    Closed,
}
