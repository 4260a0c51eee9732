//! Conversion of published JWK descriptors into verification keys

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::AlgorithmParameters;
use jsonwebtoken::jwk::EllipticCurveKeyParameters;
use jsonwebtoken::jwk::Jwk;
use jsonwebtoken::jwk::RSAKeyParameters;

use crate::error::KeySetError;
use crate::error::malformed_key_error;

/// A public key as published in a user pool's `jwks.json`
///
/// Untrusted until it has been decoded by [`decode_key`].
pub type KeyDescriptor = Jwk;

/// Convert a key descriptor into a key usable for signature verification
///
/// Only RSA and EC keys are supported, anything else is a malformed key.
pub fn decode_key(descriptor: &KeyDescriptor) -> Result<DecodingKey, KeySetError> {
    let kid = descriptor.common.key_id.as_deref().unwrap_or_default();
    let malformed = |error: jsonwebtoken::errors::Error| malformed_key_error(kid, error.to_string());

    match &descriptor.algorithm {
        AlgorithmParameters::RSA(RSAKeyParameters { n, e, .. }) => {
            require_component(kid, "n", n)?;
            require_component(kid, "e", e)?;
            DecodingKey::from_rsa_components(n, e).map_err(malformed)
        }
        AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters { x, y, .. }) => {
            require_component(kid, "x", x)?;
            require_component(kid, "y", y)?;
            DecodingKey::from_ec_components(x, y).map_err(malformed)
        }
        _ => Err(malformed_key_error(
            kid,
            "only RSA or EC keys are supported",
        )),
    }
}

fn require_component(kid: &str, name: &str, value: &str) -> Result<(), KeySetError> {
    if value.is_empty() {
        return Err(malformed_key_error(kid, format!("missing '{name}' component")));
    }
    Ok(())
}
