//! Structural decoding of tokens before any trust decision
//!
//! Nothing returned from here has been verified. It is only used to pick the
//! checks and the key that the signature verification step runs with.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::claims::Claims;
use crate::error::Error;
use crate::error::Result;

/// The JOSE header fields the verifier relies on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub typ: Option<String>,
}

/// A token split into header and claims with its signature left unchecked
#[derive(Clone)]
pub struct UnverifiedToken {
    pub header: TokenHeader,
    pub claims: Claims,
}

/// Claims are left out to keep them away from logs.
impl fmt::Debug for UnverifiedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnverifiedToken")
            .field("header", &self.header)
            .field("claims", &"[REDACTED]")
            .finish()
    }
}

/// Decode a token's header and payload without verifying its signature
///
/// # Errors
/// Returns `Error::MalformedToken` unless the token has exactly three
/// base64url segments and the first two are JSON objects.
pub fn inspect(token: &str) -> Result<UnverifiedToken> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(Error::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let header = decode_json_segment::<TokenHeader>(header, "header")?;
    let claims = decode_json_segment::<Claims>(payload, "payload")?;
    if signature.is_empty() {
        return Err(Error::MalformedToken("signature is empty".to_string()));
    }
    decode_segment(signature, "signature")?;

    Ok(UnverifiedToken { header, claims })
}

fn decode_segment(encoded: &str, segment: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| Error::MalformedToken(format!("{segment} is not valid base64url")))
}

fn decode_json_segment<T: DeserializeOwned>(encoded: &str, segment: &str) -> Result<T> {
    let bytes = decode_segment(encoded, segment)?;
    serde_json::from_slice(&bytes)
        .map_err(|error| Error::MalformedToken(format!("{segment} is not valid JSON: {error}")))
}
