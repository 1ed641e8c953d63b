//! # Passkey Registration Ceremony
//!
//! Client side of enrolling a new passkey. Registration takes two round-trips
//! with the platform ceremony in between.
//!
//! ## Registration Flow
//! 1. **Start**: POST the username → receive creation options
//! 2. **Create**: decode options → `navigator.credentials.create()`
//! 3. **Finish**: encode the new credential → POST it back
//!
//! ## Ordering
//! Options are fully decoded before the authenticator is asked for anything,
//! and the credential is fully encoded before it is submitted. A bad payload
//! therefore fails the attempt without ever prompting the user.

use crate::error::{CeremonyError, CeremonyResult};
use crate::feedback::Feedback;
use crate::state::{CeremonyState, PasskeyClient};
use crate::transport::Transport;
use crate::webauthn::provider::CeremonyProvider;
use crate::webauthn::types::CreationOptions;

/// Run one registration attempt for `username`.
///
/// ## Flow
/// 1. Reject an empty username before touching the network
/// 2. Ask the relying party for creation options
/// 3. Show the interim "Registering...." message
/// 4. Decode challenge, user id, and excluded credential ids
/// 5. Run the platform creation ceremony
/// 6. Encode and submit the credential
///
/// ## Errors
/// - `EmptyUsername`: nothing typed in
/// - `UsernameConflict`: start endpoint refused (name already taken)
/// - `MalformedEncoding`: options body missing fields or bad base64
/// - `CeremonyAborted`: user cancelled or authenticator failed
/// - `ServerRejectedResult`: finish endpoint refused the credential
/// - `Transport`: no reply from the relying party
pub(crate) async fn register<T, P, F>(
    client: &PasskeyClient<T, P, F>,
    username: &str,
) -> CeremonyResult<()>
where
    T: Transport,
    P: CeremonyProvider,
    F: Feedback,
{
    // Fail fast, no wasted round-trip
    if username.is_empty() {
        return Err(CeremonyError::EmptyUsername);
    }

    client.transition(CeremonyState::AwaitingOptions);
    let start = client
        .transport
        .post(&client.endpoints.start_register(username), None)
        .await?;

    if !start.is_success() {
        return Err(CeremonyError::UsernameConflict {
            status: start.status,
        });
    }

    client.feedback.show_neutral(client.messages.registering);

    let options = CreationOptions::from_json(&start.body)?;
    tracing::debug!(
        excluded = options.exclude_credentials.as_ref().map_or(0, Vec::len),
        "creation options decoded"
    );

    client.transition(CeremonyState::InvokingCeremony);
    let credential = client.provider.create(options).await?;

    client.transition(CeremonyState::SubmittingResult);
    let body = serde_json::to_value(credential.to_wire())?;
    let finish = client
        .transport
        .post(client.endpoints.finish_register(), Some(&body))
        .await?;

    if !finish.is_success() {
        return Err(CeremonyError::ServerRejectedResult {
            status: finish.status,
        });
    }

    Ok(())
}
