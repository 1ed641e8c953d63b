use crate::error::{CeremonyError, CeremonyResult};
use crate::feedback::Feedback;
use crate::state::{CeremonyState, PasskeyClient};
use crate::transport::Transport;
use crate::webauthn::provider::CeremonyProvider;
use crate::webauthn::types::RequestOptions;

pub(crate) async fn login<T, P, F>(
    client: &PasskeyClient<T, P, F>,
    username: &str,
) -> CeremonyResult<()>
where
    T: Transport,
    P: CeremonyProvider,
    F: Feedback,
{
    if username.is_empty() {
        return Err(CeremonyError::EmptyUsername);
    }

    // Get request options
    client.transition(CeremonyState::AwaitingOptions);
    let start = client
        .transport
        .post(&client.endpoints.start_login(username), None)
        .await?;

    match start.status {
        _ if start.is_success() => {}
        404 => return Err(CeremonyError::UserNotFound(start.body)),
        status => return Err(CeremonyError::ServerError { status }),
    }

    let options = RequestOptions::from_json(&start.body)?;

    // Sign the challenge
    client.transition(CeremonyState::InvokingCeremony);
    let assertion = client.provider.get(options).await?;

    // Submit the assertion; the relying party sets up the session on success
    client.transition(CeremonyState::SubmittingResult);
    let body = serde_json::to_value(assertion.to_wire())?;
    let finish = client
        .transport
        .post(client.endpoints.finish_login(), Some(&body))
        .await?;

    if !finish.is_success() {
        return Err(CeremonyError::ServerRejectedResult {
            status: finish.status,
        });
    }

    Ok(())
}
