//! # Ceremony Provider
//!
//! The platform primitive that actually talks to an authenticator. In a
//! browser this is `navigator.credentials` (see `webauthn::browser`). Tests
//! plug in scripted providers.
//!
//! Implementations receive fully decoded options and must return raw bytes.
//! Any rejection (user cancelled, timeout, authenticator error) is reported as
//! `CeremonyError::CeremonyAborted`.

use crate::error::CeremonyResult;
use crate::webauthn::types::{
    AssertionCredential, CreationOptions, RegistrationCredential, RequestOptions,
};
use async_trait::async_trait;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait CeremonyProvider {
    /// Run a credential-creation ceremony.
    async fn create(&self, options: CreationOptions) -> CeremonyResult<RegistrationCredential>;

    /// Run a credential-assertion ceremony.
    async fn get(&self, options: RequestOptions) -> CeremonyResult<AssertionCredential>;
}
