use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use reqwest::Client;
use serde::Deserialize;

use crate::error::Error;
use crate::error::Result;

const DEFAULT_TOKEN_EXPIRATION_MILLIS: u64 = 3_600_000;

/// The purpose a Cognito token was issued for, as carried in its `token_use` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenUse {
    Access,
    Id,
}

impl TokenUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenUse::Access => "access",
            TokenUse::Id => "id",
        }
    }
}

impl fmt::Display for TokenUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenUse {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "access" => Ok(TokenUse::Access),
            "id" => Ok(TokenUse::Id),
            "" => Err(Error::Configuration(
                "Token use not specified. Possible values 'access' | 'id'".to_string(),
            )),
            other => Err(Error::Configuration(format!(
                "Token use {other:?} is not valid. Possible values 'access' | 'id'"
            ))),
        }
    }
}

/// Trust parameters for verifying tokens of one Cognito user pool
///
/// Validated once at construction; a `VerifierConfig` that exists is always usable.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub(crate) region: String,
    pub(crate) user_pool_id: String,
    pub(crate) token_use: TokenUse,
    /// The only signature algorithm accepted (default: RS256)
    pub(crate) algorithm: Algorithm,
    /// Maximum time elapsed since the token's `iat` (default: 1 hour)
    pub(crate) token_expiration: Duration,
    /// Local JWKS document, used instead of downloading it when set
    pub(crate) jwks_path: Option<PathBuf>,
    /// Base URL standing in for `https://cognito-idp.<region>.amazonaws.com`
    pub(crate) endpoint: Option<String>,
    /// Optional custom HTTP client for fetching JWKS
    /// If not provided, a default client will be created
    pub(crate) http_client: Option<Client>,
}

impl VerifierConfig {
    /// Create a new configuration for the given region, user pool and token use
    ///
    /// # Errors
    /// Returns `Error::Configuration` if the region or user pool id is empty,
    /// or if the token use is not one of `access` | `id`
    pub fn new(
        region: impl Into<String>,
        user_pool_id: impl Into<String>,
        token_use: impl AsRef<str>,
    ) -> Result<Self> {
        let region = region.into();
        let user_pool_id = user_pool_id.into();

        if region.trim().is_empty() {
            return Err(Error::Configuration("AWS region not specified".to_string()));
        }
        if user_pool_id.trim().is_empty() {
            return Err(Error::Configuration(
                "Cognito user pool id not specified".to_string(),
            ));
        }
        let token_use = token_use.as_ref().parse()?;

        Ok(Self {
            region,
            user_pool_id,
            token_use,
            algorithm: Algorithm::RS256,
            token_expiration: Duration::from_millis(DEFAULT_TOKEN_EXPIRATION_MILLIS),
            jwks_path: None,
            endpoint: None,
            http_client: None,
        })
    }

    /// Set the signature algorithm tokens must be signed with
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the maximum age of a token, measured from its `iat` claim
    pub fn with_token_expiration(mut self, max_age: Duration) -> Self {
        self.token_expiration = max_age;
        self
    }

    /// Read the JWKS from a local file instead of downloading it
    pub fn with_jwks_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.jwks_path = Some(path.into());
        self
    }

    /// Replace the Cognito host, e.g. with a local emulator
    ///
    /// The expected issuer becomes `<endpoint>/<user_pool_id>`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    /// Set a custom HTTP client
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// The `iss` value every accepted token must carry
    pub fn issuer(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{endpoint}/{}", self.user_pool_id),
            None => format!(
                "https://cognito-idp.{}.amazonaws.com/{}",
                self.region, self.user_pool_id
            ),
        }
    }

    /// Location of the published key set for this user pool
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    pub fn token_use(&self) -> TokenUse {
        self.token_use
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn token_expiration(&self) -> Duration {
        self.token_expiration
    }
}

/// Deserializable verifier options, e.g. from a service's JSON or YAML config file
///
/// ```json
/// {
///   "region": "eu-west-1",
///   "cognitoUserPoolId": "eu-west-1_AbCdEf123",
///   "tokenUse": "access",
///   "alg": "RS256",
///   "tokenExpiration": 3600000
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierSettings {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub cognito_user_pool_id: String,
    #[serde(default)]
    pub token_use: String,
    pub alg: Option<String>,
    /// Maximum token age in milliseconds
    pub token_expiration: Option<u64>,
    pub filepath: Option<PathBuf>,
    pub endpoint: Option<String>,
}

impl TryFrom<VerifierSettings> for VerifierConfig {
    type Error = Error;

    fn try_from(settings: VerifierSettings) -> Result<Self> {
        let mut config = VerifierConfig::new(
            settings.region,
            settings.cognito_user_pool_id,
            &settings.token_use,
        )?;

        if let Some(alg) = settings.alg {
            let algorithm = alg
                .parse::<Algorithm>()
                .map_err(|_| Error::Configuration(format!("Unsupported algorithm {alg:?}")))?;
            config = config.with_algorithm(algorithm);
        }
        if let Some(millis) = settings.token_expiration {
            config = config.with_token_expiration(Duration::from_millis(millis));
        }
        if let Some(path) = settings.filepath {
            config = config.with_jwks_path(path);
        }
        if let Some(endpoint) = settings.endpoint {
            config = config.with_endpoint(endpoint);
        }

        Ok(config)
    }
}
