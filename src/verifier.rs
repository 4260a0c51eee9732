use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use tracing::trace;

use crate::claims::Claims;
use crate::config::VerifierConfig;
use crate::config::VerifierSettings;
use crate::error::Error;
use crate::error::Result;
use crate::inspector::UnverifiedToken;
use crate::inspector::inspect;
use crate::key_set::KeySetCache;

/// Trait for JWT verification
#[async_trait]
pub trait VerifyJwt {
    /// The claims handed back for a token that passed every check
    type Claims;

    /// Verify a JWT token and return its claims
    async fn verify(&self, token: &str) -> Result<Self::Claims>;
}

/// Verifier for tokens issued by one Cognito user pool
///
/// Meant to be shared (e.g. behind an `Arc`) by every request handler. The
/// user pool's JWKS is fetched on first use and kept for the verifier's
/// lifetime, including a failed fetch: build a new verifier to retry or to
/// pick up rotated keys.
pub struct CognitoVerifier {
    config: VerifierConfig,
    issuer: String,
    key_set: KeySetCache,
}

impl CognitoVerifier {
    /// Create a new verifier. No I/O happens until the first verification
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            issuer: config.issuer(),
            key_set: KeySetCache::new(&config),
            config,
        }
    }

    /// Create a new verifier from deserialized settings
    ///
    /// # Errors
    /// Returns `Error::Configuration` if the settings are incomplete or invalid
    pub fn from_settings(settings: VerifierSettings) -> Result<Self> {
        Ok(Self::new(VerifierConfig::try_from(settings)?))
    }

    /// Load the JWKS now instead of on the first verification
    ///
    /// Joins the load already in flight, if any, and reports its outcome.
    pub async fn warm_up(&self) -> Result<()> {
        self.key_set.get().await.map(|_| ())
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Reject tokens from another pool or for another purpose before touching any key
    fn check_trust_boundary(&self, token: &UnverifiedToken) -> Result<()> {
        let iss = token.claims.iss();
        if iss != Some(self.issuer.as_str()) {
            return Err(Error::IssuerMismatch(iss.map(str::to_string)));
        }

        let token_use = token.claims.token_use();
        if token_use != Some(self.config.token_use.as_str()) {
            return Err(Error::PurposeMismatch {
                expected: self.config.token_use.to_string(),
                actual: token_use.map(str::to_string),
            });
        }

        Ok(())
    }

    /// Validate the JWT token with full signature verification
    fn validate_jwt(&self, token: &str, decoding_key: &DecodingKey) -> Result<Claims> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["iss"]);
        // Cognito access tokens carry `client_id` rather than `aud`
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, decoding_key, &validation)?;
        check_token_age(&token_data.claims, self.config.token_expiration)?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl VerifyJwt for CognitoVerifier {
    type Claims = Claims;

    async fn verify(&self, token: &str) -> Result<Self::Claims> {
        let key_set = self.key_set.get().await?;
        let unverified = inspect(token)?;
        self.check_trust_boundary(&unverified)?;

        let kid = unverified.header.kid.as_deref();
        let decoding_key = kid
            .and_then(|kid| key_set.get(kid))
            .ok_or_else(|| Error::UnknownKey(kid.map(str::to_string)))?;

        trace!(kid, alg = %unverified.header.alg, "Verifying token signature");
        self.validate_jwt(token, decoding_key)
    }
}

/// Leeway `jsonwebtoken` applies to `exp` by default
const EXP_LEEWAY_MILLIS: i64 = 60_000;

/// Reject tokens issued longer than `max_age` ago
///
/// Tokens without `iat` are only accepted when they carry a numeric `exp`.
/// A timestamp claim that is present but not a number counts as missing.
fn check_token_age(claims: &Claims, max_age: Duration) -> Result<()> {
    let now_millis = Utc::now().timestamp_millis();

    // Covers fractional NumericDates as well as integer ones
    match (claims.get("exp"), claims.exp()) {
        (Some(_), None) => return Err(missing_claim("exp")),
        (_, Some(exp)) if exp.saturating_mul(1000) < now_millis - EXP_LEEWAY_MILLIS => {
            return Err(Error::SignatureOrClaim(ErrorKind::ExpiredSignature.into()));
        }
        _ => {}
    }

    let iat = match (claims.get("iat"), claims.iat()) {
        (_, Some(iat)) => iat,
        (None, None) if claims.exp().is_some() => return Ok(()),
        _ => return Err(missing_claim("iat")),
    };

    let max_age_millis = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    let age_millis = now_millis.saturating_sub(iat.saturating_mul(1000));

    if age_millis > max_age_millis {
        return Err(Error::SignatureOrClaim(ErrorKind::ExpiredSignature.into()));
    }

    Ok(())
}

fn missing_claim(name: &str) -> Error {
    Error::SignatureOrClaim(ErrorKind::MissingRequiredClaim(name.to_string()).into())
}
