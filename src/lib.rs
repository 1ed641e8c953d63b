//! # Passkey Ceremony Client
//!
//! Client side of passwordless login with passkeys (WebAuthn). The relying
//! party hands out challenges and verifies results; this crate shuttles data
//! between it and the platform authenticator.
//!
//! ## Key Concepts
//! - **Ceremony**: a platform-mediated create (registration) or get
//!   (authentication) that proves possession of a key
//! - **Wire encoding**: binary fields travel as URL-safe base64 inside JSON
//! - **Two round-trips**: start (fetch options) → platform ceremony → finish
//!   (submit result)
//!
//! ## Example
//! ```no_run
//! # use passkey_ceremony::{ClientConfig, HttpTransport, PasskeyClient, TracingFeedback};
//! # use passkey_ceremony::webauthn::provider::CeremonyProvider;
//! # async fn demo(provider: impl CeremonyProvider) -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let transport = HttpTransport::from_config(&config)?;
//! let client = PasskeyClient::new(&config, transport, provider, TracingFeedback);
//!
//! let done = client.login("alice").await;
//! assert!(done.is_done());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod state;
pub mod telemetry;
pub mod transport;
#[cfg(target_arch = "wasm32")]
pub mod web;
pub mod webauthn;

pub use config::{ClientConfig, Endpoints, Variant};
pub use error::{CeremonyError, CeremonyResult};
pub use feedback::{Feedback, FeedbackState, FlashMessage, Flow, Messages, Tone, TracingFeedback};
pub use state::{CeremonyState, Outcome, PasskeyClient};
pub use transport::{HttpResponse, HttpTransport, Transport};
