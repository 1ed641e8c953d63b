//! # Client State
//!
//! [`PasskeyClient`] bundles everything a ceremony needs:
//! - a [`Transport`] to reach the relying party
//! - a [`CeremonyProvider`] to reach the authenticator
//! - a [`Feedback`] region to talk to the user
//!
//! It also tracks where the current ceremony is in its state machine:
//!
//! ```text
//! Idle → AwaitingOptions → InvokingCeremony → SubmittingResult → Done(outcome)
//!             │                   │                  │
//!             └───────────────────┴──────────────────┴──→ Done(Failure(..))
//! ```
//!
//! Only one ceremony runs at a time per client. A trigger that arrives while
//! another ceremony is pending is turned away with `CeremonyInProgress` and
//! leaves the running ceremony (and its feedback) alone.

use crate::config::{ClientConfig, Endpoints};
use crate::error::{CeremonyError, CeremonyResult};
use crate::feedback::{Feedback, Flow, Messages};
use crate::transport::Transport;
use crate::webauthn::provider::CeremonyProvider;
use crate::webauthn::{authentication, registration};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// How a finished ceremony ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(CeremonyError),
}

/// Position in the ceremony state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CeremonyState {
    #[default]
    Idle,
    /// Waiting for the start endpoint to hand out options.
    AwaitingOptions,
    /// Options decoded; the platform ceremony is running.
    InvokingCeremony,
    /// Credential encoded; waiting for the finish endpoint.
    SubmittingResult,
    Done(Outcome),
}

impl CeremonyState {
    pub fn is_done(&self) -> bool {
        matches!(self, CeremonyState::Done(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CeremonyState::Done(Outcome::Success))
    }

    /// The failure this ceremony ended with, if any.
    pub fn failure(&self) -> Option<&CeremonyError> {
        match self {
            CeremonyState::Done(Outcome::Failure(err)) => Some(err),
            _ => None,
        }
    }
}

type Observer = Box<dyn Fn(&CeremonyState) + Send + Sync>;

/// Clears the in-flight flag however the ceremony ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Passkey ceremony orchestrator
pub struct PasskeyClient<T, P, F> {
    pub(crate) transport: T,
    pub(crate) provider: P,
    pub(crate) feedback: F,
    pub(crate) endpoints: Endpoints,
    pub(crate) messages: Messages,
    state: Mutex<CeremonyState>,
    in_flight: AtomicBool,
    observer: Option<Observer>,
}

impl<T, P, F> PasskeyClient<T, P, F>
where
    T: Transport,
    P: CeremonyProvider,
    F: Feedback,
{
    pub fn new(config: &ClientConfig, transport: T, provider: P, feedback: F) -> Self {
        PasskeyClient {
            transport,
            provider,
            feedback,
            endpoints: config.endpoints(),
            messages: Messages::for_variant(config.variant),
            state: Mutex::new(CeremonyState::Idle),
            in_flight: AtomicBool::new(false),
            observer: None,
        }
    }

    /// Replace the feedback wording.
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Call `observer` on every state transition.
    pub fn on_transition(
        mut self,
        observer: impl Fn(&CeremonyState) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> CeremonyState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Register a new passkey for `username`.
    ///
    /// Always resolves to `CeremonyState::Done`; failures are reported to the
    /// feedback region and returned, never raised.
    pub async fn register(&self, username: &str) -> CeremonyState {
        self.run(Flow::Registration, registration::register(self, username))
            .await
    }

    /// Log in as `username` with an existing passkey.
    ///
    /// `Done(Success)` means the relying party accepted the assertion and has
    /// set up the session on its side.
    pub async fn login(&self, username: &str) -> CeremonyState {
        self.run(Flow::Authentication, authentication::login(self, username))
            .await
    }

    pub(crate) fn transition(&self, next: CeremonyState) {
        tracing::debug!(state = ?next, "ceremony transition");
        if let Some(observer) = &self.observer {
            observer(&next);
        }
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    async fn run(
        &self,
        flow: Flow,
        ceremony: impl Future<Output = CeremonyResult<()>>,
    ) -> CeremonyState {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!(?flow, "ignoring trigger while a ceremony is in flight");
            return CeremonyState::Done(Outcome::Failure(CeremonyError::CeremonyInProgress));
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.feedback.clear();

        let outcome = match ceremony.await {
            Ok(()) => {
                tracing::info!(?flow, "passkey ceremony succeeded");
                self.feedback.show_success(self.messages.success(flow));
                Outcome::Success
            }
            Err(err) => {
                tracing::warn!(?flow, error = %err, "passkey ceremony failed");
                self.feedback
                    .show_error(&self.messages.for_error(flow, &err));
                Outcome::Failure(err)
            }
        };

        let done = CeremonyState::Done(outcome);
        self.transition(done.clone());
        done
    }
}
