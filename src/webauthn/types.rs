//! # WebAuthn Ceremony Types
//!
//! Two families of types live here:
//! - **Decoded** types (`CreationOptions`, `RegistrationCredential`, ...) hold
//!   binary fields as `Vec<u8>`. These are what the platform ceremony consumes
//!   and produces.
//! - **Wire** types (`*Json`) hold the same binary fields as URL-safe base64
//!   text. These are what crosses HTTP.
//!
//! Options come in over the wire and are decoded; credentials come out of the
//! platform and are encoded. Only the named binary fields are transcoded.
//! Everything else the server sends (rp, pubKeyCredParams, timeout,
//! authenticatorSelection, descriptor `type`, ...) is kept verbatim in an
//! `extra` map and handed to the platform untouched.

use crate::error::CeremonyResult;
use crate::webauthn::encoding::{decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Options: server → client

#[derive(Debug, Deserialize)]
struct CreationEnvelope {
    #[serde(rename = "publicKey")]
    public_key: WireCreationOptions,
}

#[derive(Debug, Deserialize)]
struct WireCreationOptions {
    challenge: String,
    user: WireUser,
    #[serde(rename = "excludeCredentials", default)]
    exclude_credentials: Option<Vec<WireDescriptor>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireDescriptor {
    id: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    #[serde(rename = "publicKey")]
    public_key: WireRequestOptions,
}

#[derive(Debug, Deserialize)]
struct WireRequestOptions {
    challenge: String,
    #[serde(rename = "allowCredentials", default)]
    allow_credentials: Option<Vec<WireDescriptor>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A credential reference (exclude list or allow list entry).
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDescriptor {
    pub id: Vec<u8>,
    /// `type`, `transports`, and anything else the server attached.
    pub extra: Map<String, Value>,
}

impl CredentialDescriptor {
    fn decode(wire: WireDescriptor) -> CeremonyResult<Self> {
        Ok(CredentialDescriptor {
            id: decode(&wire.id)?,
            extra: wire.extra,
        })
    }
}

fn decode_descriptors(
    wire: Option<Vec<WireDescriptor>>,
) -> CeremonyResult<Option<Vec<CredentialDescriptor>>> {
    wire.map(|list| {
        list.into_iter()
            .map(CredentialDescriptor::decode)
            .collect::<CeremonyResult<Vec<_>>>()
    })
    .transpose()
}

/// The user entity of a creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub id: Vec<u8>,
    /// `name`, `displayName`.
    pub extra: Map<String, Value>,
}

/// Decoded `publicKey` options for `navigator.credentials.create`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationOptions {
    pub challenge: Vec<u8>,
    pub user: UserEntity,
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    pub extra: Map<String, Value>,
}

impl CreationOptions {
    /// Parse and decode a start-registration response body.
    ///
    /// The body must be `{ "publicKey": { "challenge": .., "user": { "id": .. }, .. } }`.
    /// A missing field or a bad binary field is `MalformedEncoding`.
    pub fn from_json(body: &str) -> CeremonyResult<Self> {
        let CreationEnvelope { public_key } = serde_json::from_str(body)?;

        Ok(CreationOptions {
            challenge: decode(&public_key.challenge)?,
            user: UserEntity {
                id: decode(&public_key.user.id)?,
                extra: public_key.user.extra,
            },
            exclude_credentials: decode_descriptors(public_key.exclude_credentials)?,
            extra: public_key.extra,
        })
    }
}

/// Decoded `publicKey` options for `navigator.credentials.get`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub challenge: Vec<u8>,
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    /// Parse and decode a start-login response body.
    pub fn from_json(body: &str) -> CeremonyResult<Self> {
        let RequestEnvelope { public_key } = serde_json::from_str(body)?;

        Ok(RequestOptions {
            challenge: decode(&public_key.challenge)?,
            allow_credentials: decode_descriptors(public_key.allow_credentials)?,
            extra: public_key.extra,
        })
    }
}

// Credentials: platform → server

/// Output of a creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredential {
    /// Text form of the credential id, as reported by the platform.
    pub id: String,
    pub raw_id: Vec<u8>,
    /// Always `"public-key"` in practice; passed through as reported.
    pub credential_type: String,
    pub response: AttestationResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Output of an assertion ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub credential_type: String,
    pub response: AssertionResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    /// Authenticators may omit the user handle for non-discoverable credentials.
    pub user_handle: Option<Vec<u8>>,
}

/// Body of the finish-registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCredentialJson {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub response: AttestationResponseJson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationResponseJson {
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

/// Body of the finish-login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionCredentialJson {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub response: AssertionResponseJson,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResponseJson {
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    #[serde(rename = "userHandle", default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

impl RegistrationCredential {
    pub fn to_wire(&self) -> RegistrationCredentialJson {
        RegistrationCredentialJson {
            id: self.id.clone(),
            raw_id: encode(&self.raw_id),
            credential_type: self.credential_type.clone(),
            response: AttestationResponseJson {
                attestation_object: encode(&self.response.attestation_object),
                client_data_json: encode(&self.response.client_data_json),
            },
        }
    }
}

impl AssertionCredential {
    pub fn to_wire(&self) -> AssertionCredentialJson {
        AssertionCredentialJson {
            id: self.id.clone(),
            raw_id: encode(&self.raw_id),
            credential_type: self.credential_type.clone(),
            response: AssertionResponseJson {
                authenticator_data: encode(&self.response.authenticator_data),
                client_data_json: encode(&self.response.client_data_json),
                signature: encode(&self.response.signature),
                user_handle: self.response.user_handle.as_deref().map(encode),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CeremonyError;
    use serde_json::json;

    #[test]
    fn creation_options_decode_binary_fields_only() {
        let body = json!({
            "publicKey": {
                "rp": { "id": "localhost", "name": "Nonce Guess" },
                "user": { "id": "QQ", "name": "alice", "displayName": "alice" },
                "challenge": "AAAA",
                "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
                "excludeCredentials": [{ "type": "public-key", "id": "AQID" }],
                "timeout": 60000
            }
        })
        .to_string();

        let opts = CreationOptions::from_json(&body).unwrap();
        assert_eq!(opts.challenge, vec![0, 0, 0]);
        assert_eq!(opts.user.id, vec![0x41]);
        assert_eq!(opts.user.extra["name"], "alice");

        let excluded = opts.exclude_credentials.unwrap();
        assert_eq!(excluded[0].id, vec![1, 2, 3]);
        assert_eq!(excluded[0].extra["type"], "public-key");

        assert_eq!(opts.extra["timeout"], 60000);
        assert_eq!(opts.extra["rp"]["name"], "Nonce Guess");
        assert!(!opts.extra.contains_key("challenge"));
    }

    #[test]
    fn missing_exclude_list_is_none() {
        let body = r#"{"publicKey":{"challenge":"AAAA","user":{"id":"QQ"}}}"#;
        let opts = CreationOptions::from_json(body).unwrap();
        assert!(opts.exclude_credentials.is_none());
    }

    #[test]
    fn missing_user_id_is_malformed() {
        let body = r#"{"publicKey":{"challenge":"AAAA","user":{"name":"alice"}}}"#;
        assert!(matches!(
            CreationOptions::from_json(body),
            Err(CeremonyError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn bad_allow_list_entry_is_malformed() {
        let body = r#"{"publicKey":{"challenge":"AAAA","allowCredentials":[{"id":"a+b/"}]}}"#;
        assert!(matches!(
            RequestOptions::from_json(body),
            Err(CeremonyError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn assertion_json_shape() {
        let cred = AssertionCredential {
            id: "AQID".to_string(),
            raw_id: vec![1, 2, 3],
            credential_type: "public-key".to_string(),
            response: AssertionResponse {
                authenticator_data: vec![9],
                client_data_json: b"{}".to_vec(),
                signature: vec![0xff],
                user_handle: None,
            },
        };

        let value = serde_json::to_value(cred.to_wire()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "AQID",
                "rawId": "AQID",
                "type": "public-key",
                "response": {
                    "authenticatorData": "CQ",
                    "clientDataJSON": "e30",
                    "signature": "_w"
                }
            })
        );
    }
}
