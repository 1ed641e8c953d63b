//! # Error Handling
//!
//! This module defines the error type for a passkey ceremony attempt.
//!
//! Every variant terminates the current attempt. The orchestrator never
//! retries: the server's challenge is single-use, so recovering from any of
//! these means the user starts a fresh ceremony.
//!
//! ## Where errors go
//! Errors never escape the orchestrator as `Err`. Each one is:
//! 1. Logged with `tracing`
//! 2. Turned into exactly one feedback message (see [`crate::feedback::Messages`])
//! 3. Returned inside `CeremonyState::Done(Outcome::Failure(..))`

use thiserror::Error;

/// Everything that can end a ceremony attempt early.
///
/// The `#[error(...)]` strings are for logs. User-facing text lives in
/// [`crate::feedback::Messages`] because it depends on the flow and variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CeremonyError {
    /// The username field was empty. No request was made.
    #[error("username is empty")]
    EmptyUsername,

    /// Start-registration answered with a non-success status
    /// (the username is already registered).
    #[error("username already registered (status {status})")]
    UsernameConflict { status: u16 },

    /// Start-login answered 404. Carries the server's response body.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Start-login answered with a non-success status other than 404.
    #[error("server error (status {status})")]
    ServerError { status: u16 },

    /// A finish endpoint rejected the submitted credential.
    #[error("server rejected the credential (status {status})")]
    ServerRejectedResult { status: u16 },

    /// A payload from the server was not valid JSON, missed a required field,
    /// or carried a binary field that is not URL-safe base64.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The platform ceremony was cancelled, timed out, or failed.
    #[error("ceremony aborted: {0}")]
    CeremonyAborted(String),

    /// Another ceremony is still running on this client.
    #[error("a ceremony is already in progress")]
    CeremonyInProgress,

    /// The HTTP request itself failed (no response was received).
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<base64::DecodeError> for CeremonyError {
    fn from(e: base64::DecodeError) -> Self {
        CeremonyError::MalformedEncoding(e.to_string())
    }
}

impl From<serde_json::Error> for CeremonyError {
    fn from(e: serde_json::Error) -> Self {
        CeremonyError::MalformedEncoding(e.to_string())
    }
}

impl From<reqwest::Error> for CeremonyError {
    fn from(e: reqwest::Error) -> Self {
        CeremonyError::Transport(e.to_string())
    }
}

/// Shorthand for results inside a ceremony.
pub type CeremonyResult<T> = Result<T, CeremonyError>;
