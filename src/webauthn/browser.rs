//! # Browser Ceremony Provider
//!
//! `navigator.credentials.create()` / `.get()` driven from Rust.
//!
//! Decoded options are turned back into a JS object: pass-through fields are
//! rebuilt from JSON, binary fields become `Uint8Array`s. The returned
//! `PublicKeyCredential`'s `ArrayBuffer`s are copied out into `Vec<u8>`.

use crate::error::{CeremonyError, CeremonyResult};
use crate::webauthn::provider::CeremonyProvider;
use crate::webauthn::types::{
    AssertionCredential, AssertionResponse, AttestationResponse, CreationOptions,
    CredentialDescriptor, RegistrationCredential, RequestOptions,
};
use async_trait::async_trait;
use js_sys::{Array, ArrayBuffer, Object, Reflect, Uint8Array, JSON};
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CredentialCreationOptions, CredentialRequestOptions, CredentialsContainer};

/// Platform authenticator reached through the page's `navigator`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserCeremony;

/// `"{name}: {message}"` of a DOMException, or its debug form.
pub(crate) fn describe(err: &JsValue) -> String {
    let field = |key: &str| {
        Reflect::get(err, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    let (name, message) = (field("name"), field("message"));

    match (name.is_empty(), message.is_empty()) {
        (true, true) => format!("{:?}", err),
        (true, false) => message,
        (false, _) => format!("{}: {}", name, message),
    }
}

fn aborted(err: JsValue) -> CeremonyError {
    CeremonyError::CeremonyAborted(describe(&err))
}

fn malformed(err: JsValue) -> CeremonyError {
    CeremonyError::MalformedEncoding(describe(&err))
}

fn set(target: &Object, key: &str, value: &JsValue) -> CeremonyResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(malformed)
}

fn object_from(map: &Map<String, Value>) -> CeremonyResult<Object> {
    let json = serde_json::to_string(map)?;
    JSON::parse(&json)
        .map_err(malformed)?
        .dyn_into::<Object>()
        .map_err(malformed)
}

fn bytes(data: &[u8]) -> JsValue {
    Uint8Array::from(data).into()
}

fn descriptors(list: &[CredentialDescriptor]) -> CeremonyResult<Array> {
    let array = Array::new();
    for descriptor in list {
        let entry = object_from(&descriptor.extra)?;
        set(&entry, "id", &bytes(&descriptor.id))?;
        array.push(&entry);
    }
    Ok(array)
}

fn creation_request(options: &CreationOptions) -> CeremonyResult<CredentialCreationOptions> {
    let public_key = object_from(&options.extra)?;
    set(&public_key, "challenge", &bytes(&options.challenge))?;

    let user = object_from(&options.user.extra)?;
    set(&user, "id", &bytes(&options.user.id))?;
    set(&public_key, "user", &user)?;

    if let Some(excluded) = &options.exclude_credentials {
        set(&public_key, "excludeCredentials", &descriptors(excluded)?)?;
    }

    let request = Object::new();
    set(&request, "publicKey", &public_key)?;
    Ok(request.unchecked_into())
}

fn assertion_request(options: &RequestOptions) -> CeremonyResult<CredentialRequestOptions> {
    let public_key = object_from(&options.extra)?;
    set(&public_key, "challenge", &bytes(&options.challenge))?;

    if let Some(allowed) = &options.allow_credentials {
        set(&public_key, "allowCredentials", &descriptors(allowed)?)?;
    }

    let request = Object::new();
    set(&request, "publicKey", &public_key)?;
    Ok(request.unchecked_into())
}

fn credentials() -> CeremonyResult<CredentialsContainer> {
    let window = web_sys::window()
        .ok_or_else(|| CeremonyError::CeremonyAborted("no window available".to_string()))?;
    Ok(window.navigator().credentials())
}

fn field(source: &JsValue, key: &str) -> CeremonyResult<JsValue> {
    Reflect::get(source, &JsValue::from_str(key)).map_err(malformed)
}

fn read_string(source: &JsValue, key: &str) -> CeremonyResult<String> {
    field(source, key)?
        .as_string()
        .ok_or_else(|| CeremonyError::MalformedEncoding(format!("credential field '{}' is not a string", key)))
}

fn read_bytes(source: &JsValue, key: &str) -> CeremonyResult<Vec<u8>> {
    let buffer = field(source, key)?
        .dyn_into::<ArrayBuffer>()
        .map_err(|_| CeremonyError::MalformedEncoding(format!("credential field '{}' is not an ArrayBuffer", key)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

fn read_optional_bytes(source: &JsValue, key: &str) -> CeremonyResult<Option<Vec<u8>>> {
    let value = field(source, key)?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    read_bytes(source, key).map(Some)
}

/// Await a ceremony promise; `null` means the platform produced nothing.
async fn settle(promise: js_sys::Promise) -> CeremonyResult<JsValue> {
    let credential = JsFuture::from(promise).await.map_err(aborted)?;
    if credential.is_null() || credential.is_undefined() {
        return Err(CeremonyError::CeremonyAborted(
            "platform returned no credential".to_string(),
        ));
    }
    Ok(credential)
}

#[async_trait(?Send)]
impl CeremonyProvider for BrowserCeremony {
    async fn create(&self, options: CreationOptions) -> CeremonyResult<RegistrationCredential> {
        let request = creation_request(&options)?;
        let promise = credentials()?
            .create_with_options(&request)
            .map_err(aborted)?;
        let credential = settle(promise).await?;
        let response = field(&credential, "response")?;

        Ok(RegistrationCredential {
            id: read_string(&credential, "id")?,
            raw_id: read_bytes(&credential, "rawId")?,
            credential_type: read_string(&credential, "type")?,
            response: AttestationResponse {
                attestation_object: read_bytes(&response, "attestationObject")?,
                client_data_json: read_bytes(&response, "clientDataJSON")?,
            },
        })
    }

    async fn get(&self, options: RequestOptions) -> CeremonyResult<AssertionCredential> {
        let request = assertion_request(&options)?;
        let promise = credentials()?
            .get_with_options(&request)
            .map_err(aborted)?;
        let assertion = settle(promise).await?;
        let response = field(&assertion, "response")?;

        Ok(AssertionCredential {
            id: read_string(&assertion, "id")?,
            raw_id: read_bytes(&assertion, "rawId")?,
            credential_type: read_string(&assertion, "type")?,
            response: AssertionResponse {
                authenticator_data: read_bytes(&response, "authenticatorData")?,
                client_data_json: read_bytes(&response, "clientDataJSON")?,
                signature: read_bytes(&response, "signature")?,
                user_handle: read_optional_bytes(&response, "userHandle")?,
            },
        })
    }
}
