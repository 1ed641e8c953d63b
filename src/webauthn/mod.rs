//! # WebAuthn Module
//!
//! Client side of the passkey ceremonies.
//!
//! ## Submodules
//! - `encoding`: URL-safe base64 ⇄ bytes for binary fields
//! - `types`: decoded and wire forms of options and credentials
//! - `provider`: the platform ceremony seam
//! - `registration`: creating a new passkey
//! - `authentication`: logging in with an existing passkey
//! - `browser` (wasm only): `navigator.credentials` provider
//!
//! ## WebAuthn Flow Overview
//!
//! ### Registration (Creating a Passkey)
//! 1. POST start-registration → creation options (base64url fields)
//! 2. Decode challenge, user id, excluded ids → bytes
//! 3. Platform creates the credential with the authenticator
//! 4. Encode rawId, attestationObject, clientDataJSON → base64url
//! 5. POST finish-registration
//!
//! ### Authentication (Logging In)
//! 1. POST start-login → request options
//! 2. Decode challenge and allowed ids
//! 3. Platform signs the challenge
//! 4. Encode the assertion
//! 5. POST finish-login; the relying party issues the session

pub mod authentication;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod encoding;
pub mod provider;
pub mod registration;
pub mod types;
