//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use passkey_ceremony::webauthn::provider::CeremonyProvider;
use passkey_ceremony::webauthn::types::{
    AssertionCredential, AssertionResponse, AttestationResponse, CreationOptions,
    RegistrationCredential, RequestOptions,
};
use passkey_ceremony::{CeremonyError, CeremonyResult, HttpResponse, Transport};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A request the orchestrator made.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub path: String,
    pub body: Option<Value>,
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<CeremonyResult<HttpResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, err: CeremonyError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, path: &str, body: Option<&Value>) -> CeremonyResult<HttpResponse> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            body: body.cloned(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CeremonyError::Transport("no scripted reply".to_string())))
    }
}

/// Authenticator stand-in: records the options it was given and answers
/// with a fixed credential (or a fixed error).
pub struct ScriptedProvider {
    registration: CeremonyResult<RegistrationCredential>,
    assertion: CeremonyResult<AssertionCredential>,
    gate: Option<Arc<Notify>>,
    pub created: Mutex<Vec<CreationOptions>>,
    pub requested: Mutex<Vec<RequestOptions>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        ScriptedProvider {
            registration: Ok(sample_registration(vec![1, 2, 3])),
            assertion: Ok(sample_assertion(Some(vec![0x41]))),
            gate: None,
            created: Mutex::new(Vec::new()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_registration(mut self, result: CeremonyResult<RegistrationCredential>) -> Self {
        self.registration = result;
        self
    }

    pub fn with_assertion(mut self, result: CeremonyResult<AssertionCredential>) -> Self {
        self.assertion = result;
        self
    }

    /// Hold every ceremony until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn invocations(&self) -> usize {
        self.created.lock().unwrap().len() + self.requested.lock().unwrap().len()
    }

    async fn wait(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl CeremonyProvider for ScriptedProvider {
    async fn create(&self, options: CreationOptions) -> CeremonyResult<RegistrationCredential> {
        self.created.lock().unwrap().push(options);
        self.wait().await;
        self.registration.clone()
    }

    async fn get(&self, options: RequestOptions) -> CeremonyResult<AssertionCredential> {
        self.requested.lock().unwrap().push(options);
        self.wait().await;
        self.assertion.clone()
    }
}

pub fn sample_registration(raw_id: Vec<u8>) -> RegistrationCredential {
    RegistrationCredential {
        id: passkey_ceremony::webauthn::encoding::encode(&raw_id),
        raw_id,
        credential_type: "public-key".to_string(),
        response: AttestationResponse {
            attestation_object: vec![0xa3, 0x63, 0x66, 0x6d, 0x74],
            client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
        },
    }
}

pub fn sample_assertion(user_handle: Option<Vec<u8>>) -> AssertionCredential {
    AssertionCredential {
        id: "BAUG".to_string(),
        raw_id: vec![4, 5, 6],
        credential_type: "public-key".to_string(),
        response: AssertionResponse {
            authenticator_data: vec![0x49, 0x96, 0x0d],
            client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
            signature: vec![0x30, 0x45, 0x02],
            user_handle,
        },
    }
}

pub fn creation_options_body() -> String {
    json!({
        "publicKey": {
            "rp": { "id": "localhost", "name": "Nonce Guess" },
            "user": { "id": "QQ", "name": "alice", "displayName": "alice" },
            "challenge": "AAAA",
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
            "excludeCredentials": []
        }
    })
    .to_string()
}

pub fn request_options_body() -> String {
    json!({
        "publicKey": {
            "challenge": "c2lnbi1tZQ",
            "rpId": "localhost",
            "allowCredentials": [{ "type": "public-key", "id": "BAUG" }],
            "userVerification": "preferred"
        }
    })
    .to_string()
}
