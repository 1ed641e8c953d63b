//! # Configuration Management
//!
//! Client configuration: where the relying party lives and which endpoint
//! flavour it speaks.
//!
//! ## Environment Variables
//! - `PASSKEY_BASE_URL`: Relying party base URL (default: http://localhost:8080)
//! - `PASSKEY_VARIANT`: `live` or `mockup` (default: live)
//!
//! ## Variants
//! Two deployments of the same relying party exist. They differ only in the
//! endpoint names and in the wording of a few feedback messages.

use anyhow::{anyhow, Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use std::env;
use std::str::FromStr;

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which flavour of the relying party we talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// `/start_register_passkey/{username}` and friends.
    #[default]
    Live,
    /// `/register_start/{username}` and friends.
    Mockup,
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Variant::Live),
            "mockup" => Ok(Variant::Mockup),
            other => Err(anyhow!("unknown passkey variant '{}'", other)),
        }
    }
}

/// The four relying-party endpoints for one variant.
///
/// Start paths take the raw username and percent-encode it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    start_register: &'static str,
    finish_register: &'static str,
    start_login: &'static str,
    finish_login: &'static str,
}

impl Endpoints {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Live => Endpoints {
                start_register: "/start_register_passkey",
                finish_register: "/finish_register_passkey",
                start_login: "/start_login_passkey",
                finish_login: "/finish_login_passkey",
            },
            Variant::Mockup => Endpoints {
                start_register: "/register_start",
                finish_register: "/register_finish",
                start_login: "/login_start",
                finish_login: "/login_finish",
            },
        }
    }

    pub fn start_register(&self, username: &str) -> String {
        format!("{}/{}", self.start_register, encode_segment(username))
    }

    pub fn finish_register(&self) -> &'static str {
        self.finish_register
    }

    pub fn start_login(&self, username: &str) -> String {
        format!("{}/{}", self.start_login, encode_segment(username))
    }

    pub fn finish_login(&self) -> &'static str {
        self.finish_login
    }
}

/// Percent-encode a single path segment the way `encodeURIComponent` does.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the relying party. Endpoint paths are resolved against it.
    pub base_url: Url,

    /// Endpoint names and message wording.
    pub variant: Variant,
}

impl ClientConfig {
    pub fn new(base_url: Url, variant: Variant) -> Self {
        ClientConfig { base_url, variant }
    }

    /// Load configuration from environment variables
    ///
    /// Reads a `.env` file first if one exists, then falls back to defaults
    /// for anything unset.
    ///
    /// ## Example .env file
    /// ```text
    /// PASSKEY_BASE_URL=http://localhost:8080
    /// PASSKEY_VARIANT=live
    /// ```
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("PASSKEY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("invalid PASSKEY_BASE_URL '{}'", base_url))?;

        let variant = match env::var("PASSKEY_VARIANT") {
            Ok(v) => v.parse()?,
            Err(_) => Variant::default(),
        };

        Ok(ClientConfig { base_url, variant })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::for_variant(self.variant)
    }
}
