//! # Feedback Reporting
//!
//! Every ceremony attempt talks to the user through one display region (the
//! flash message on the login page). The orchestrator writes to it through the
//! [`Feedback`] trait and never looks at what is displayed.
//!
//! ## Rules
//! - Each call replaces whatever was shown before. Tones never stack.
//! - The region holds no history. The last writer wins.
//!
//! ## Implementations
//! - [`FlashMessage`]: in-memory region, readable with [`FlashMessage::state`]
//! - [`TracingFeedback`]: writes each message to the log
//! - `DomFlashMessage` (wasm only, in `crate::web`): a real page element

use crate::config::Variant;
use crate::error::CeremonyError;
use std::sync::{Arc, Mutex};

/// Visual state of the display region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Nothing shown.
    #[default]
    Hidden,
    Neutral,
    Success,
    Error,
}

/// What the display region currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackState {
    pub tone: Tone,
    pub message: String,
}

pub trait Feedback {
    /// Hide the region and drop any tone.
    fn clear(&self);

    fn show_neutral(&self, message: &str);

    fn show_success(&self, message: &str);

    fn show_error(&self, message: &str);
}

impl<F: Feedback + ?Sized> Feedback for Arc<F> {
    fn clear(&self) {
        (**self).clear()
    }

    fn show_neutral(&self, message: &str) {
        (**self).show_neutral(message)
    }

    fn show_success(&self, message: &str) {
        (**self).show_success(message)
    }

    fn show_error(&self, message: &str) {
        (**self).show_error(message)
    }
}

/// In-memory display region.
#[derive(Debug, Default)]
pub struct FlashMessage {
    state: Mutex<FeedbackState>,
}

impl FlashMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of what is currently displayed.
    pub fn state(&self) -> FeedbackState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, tone: Tone, message: &str) {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = FeedbackState {
            tone,
            message: message.to_string(),
        };
    }
}

impl Feedback for FlashMessage {
    fn clear(&self) {
        self.set(Tone::Hidden, "");
    }

    fn show_neutral(&self, message: &str) {
        self.set(Tone::Neutral, message);
    }

    fn show_success(&self, message: &str) {
        self.set(Tone::Success, message);
    }

    fn show_error(&self, message: &str) {
        self.set(Tone::Error, message);
    }
}

/// Feedback that only goes to the log. Handy for headless callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn clear(&self) {}

    fn show_neutral(&self, message: &str) {
        tracing::info!(tone = "neutral", "{}", message);
    }

    fn show_success(&self, message: &str) {
        tracing::info!(tone = "success", "{}", message);
    }

    fn show_error(&self, message: &str) {
        tracing::warn!(tone = "error", "{}", message);
    }
}

/// Which ceremony a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Registration,
    Authentication,
}

/// User-facing text for every outcome.
///
/// The live and mockup pages word a few messages differently; everything else
/// is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub empty_username: &'static str,
    pub registering: &'static str,
    pub username_conflict: &'static str,
    pub registered: &'static str,
    pub register_failed: &'static str,
    pub logged_in: &'static str,
    pub login_failed: &'static str,
    pub login_start_failed: &'static str,
    pub user_not_found: &'static str,
    pub cancelled: &'static str,
    pub malformed: &'static str,
}

impl Messages {
    pub fn live() -> Self {
        Messages {
            empty_username: "Please enter a username.",
            registering: "Registering....",
            username_conflict: "Username already registered!",
            registered: "Successfully registered.",
            register_failed: "Error while registering!",
            logged_in: "Successfully logged in.",
            login_failed: "Error logging in!",
            login_start_failed: "Error while logging in!",
            user_not_found: "User not found",
            cancelled: "Passkey request was cancelled.",
            malformed: "Received a malformed passkey payload.",
        }
    }

    pub fn mockup() -> Self {
        Messages {
            empty_username: "Please enter a username",
            registered: "Successfully registered!",
            register_failed: "Error whilst registering!",
            login_failed: "Error whilst logging in!",
            login_start_failed: "Error whilst logging in!",
            ..Self::live()
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Live => Self::live(),
            Variant::Mockup => Self::mockup(),
        }
    }

    /// The single error message shown for `err` in `flow`.
    pub fn for_error(&self, flow: Flow, err: &CeremonyError) -> String {
        match err {
            CeremonyError::EmptyUsername => self.empty_username.to_string(),
            CeremonyError::UsernameConflict { .. } => self.username_conflict.to_string(),
            CeremonyError::UserNotFound(detail) => {
                format!("{}: {}", self.user_not_found, detail)
            }
            CeremonyError::CeremonyAborted(_) => self.cancelled.to_string(),
            CeremonyError::MalformedEncoding(_) => self.malformed.to_string(),
            CeremonyError::ServerError { .. } => match flow {
                Flow::Registration => self.register_failed.to_string(),
                Flow::Authentication => self.login_start_failed.to_string(),
            },
            CeremonyError::ServerRejectedResult { .. }
            | CeremonyError::CeremonyInProgress
            | CeremonyError::Transport(_) => match flow {
                Flow::Registration => self.register_failed.to_string(),
                Flow::Authentication => self.login_failed.to_string(),
            },
        }
    }

    pub fn success(&self, flow: Flow) -> &'static str {
        match flow {
            Flow::Registration => self.registered,
            Flow::Authentication => self.logged_in,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::live()
    }
}
