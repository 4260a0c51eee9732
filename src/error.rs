use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid verifier configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    KeySet(#[from] KeySetError),
    #[error("The provided token is not a valid JWT: {0}")]
    MalformedToken(String),
    #[error("The provided JWT is not from the configured user pool. Provided issuer: {0:?}")]
    IssuerMismatch(Option<String>),
    #[error("The provided JWT is not an {expected} token. Provided token use: {actual:?}")]
    PurposeMismatch {
        expected: String,
        actual: Option<String>,
    },
    #[error("Key of the provided JWT does not match any key in the JWKS. Provided kid: {0:?}")]
    UnknownKey(Option<String>),
    #[error("JWT signature or claim validation failed: {0}")]
    SignatureOrClaim(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    /// Whether this error comes from the verifier's trust material rather than the presented token
    pub fn is_key_set_error(&self) -> bool {
        matches!(self, Error::KeySet(_))
    }
}

/// Failures while acquiring or decoding the issuer's key set
///
/// The outcome of a key set load is memoized and replayed to every caller,
/// hence the `Clone` bound and the string payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeySetError {
    #[error("JWKS source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("JWKS document is not valid: {0}")]
    Format(String),
    #[error("Key {kid:?} in JWKS cannot be used for verification: {reason}")]
    MalformedKey { kid: String, reason: String },
}

pub(crate) fn fetch_jwks_error(error: reqwest::Error) -> KeySetError {
    KeySetError::SourceUnavailable(format!("Failed to fetch JWKS: {error}"))
}

pub(crate) fn read_jwks_error(error: std::io::Error) -> KeySetError {
    KeySetError::SourceUnavailable(format!("Failed to read JWKS file: {error}"))
}

pub(crate) fn parse_jwks_error(error: serde_json::Error) -> KeySetError {
    KeySetError::Format(error.to_string())
}

pub(crate) fn malformed_key_error(kid: &str, reason: impl Into<String>) -> KeySetError {
    KeySetError::MalformedKey {
        kid: kid.to_string(),
        reason: reason.into(),
    }
}
