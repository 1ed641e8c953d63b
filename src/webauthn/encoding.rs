//! # Wire Encoding
//!
//! Binary WebAuthn fields travel inside JSON as URL-safe base64 text. The
//! platform ceremony API wants raw bytes. These two functions convert between
//! the two forms and are applied field by field, never to whole payloads.

use crate::error::CeremonyResult;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::prelude::*;

/// URL-safe decoder that accepts input with or without `=` padding.
const WIRE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode wire text into bytes.
///
/// Fails with `MalformedEncoding` on characters outside the URL-safe
/// alphabet (`+` and `/` included) or on a length no encoder produces.
pub fn decode(text: &str) -> CeremonyResult<Vec<u8>> {
    Ok(WIRE.decode(text.as_bytes())?)
}

/// Encode bytes as unpadded URL-safe base64, the form the server expects.
pub fn encode(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}
