use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use jsonwebtoken::DecodingKey;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::codec::KeyDescriptor;
use crate::codec::decode_key;
use crate::config::VerifierConfig;
use crate::error::KeySetError;
use crate::error::Result;
use crate::error::fetch_jwks_error;
use crate::error::malformed_key_error;
use crate::error::parse_jwks_error;
use crate::error::read_jwks_error;

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<KeyDescriptor>,
}

/// Verification keys of one issuer, by key id
#[derive(Clone)]
pub struct KeySet {
    issuer: String,
    keys: HashMap<String, DecodingKey>,
}

impl KeySet {
    /// The issuer this key set was fetched for
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn kids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kids: Vec<&str> = self.kids().collect();
        kids.sort_unstable();
        f.debug_struct("KeySet")
            .field("issuer", &self.issuer)
            .field("kids", &kids)
            .finish()
    }
}

/// Where the JWKS document of a user pool is read from
enum KeySource {
    Remote { url: String, client: Client },
    File(PathBuf),
}

impl KeySource {
    fn for_config(config: &VerifierConfig) -> Self {
        match &config.jwks_path {
            Some(path) => KeySource::File(path.clone()),
            None => KeySource::Remote {
                url: config.jwks_url(),
                client: config.http_client.clone().unwrap_or_default(),
            },
        }
    }

    async fn read(&self) -> std::result::Result<String, KeySetError> {
        match self {
            KeySource::Remote { url, client } => client
                .get(url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(fetch_jwks_error)?
                .text()
                .await
                .map_err(fetch_jwks_error),
            KeySource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(read_jwks_error),
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Remote { url, .. } => f.write_str(url),
            KeySource::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Parse a JWKS document and decode every key in it
///
/// A single undecodable key rejects the whole document.
fn parse_key_set(issuer: &str, content: &str) -> std::result::Result<KeySet, KeySetError> {
    let document: JwksDocument = serde_json::from_str(content).map_err(parse_jwks_error)?;

    let mut keys = HashMap::with_capacity(document.keys.len());
    for descriptor in &document.keys {
        let kid = descriptor
            .common
            .key_id
            .clone()
            .ok_or_else(|| malformed_key_error("", "missing 'kid'"))?;
        keys.insert(kid, decode_key(descriptor)?);
    }

    Ok(KeySet {
        issuer: issuer.to_string(),
        keys,
    })
}

async fn fetch_key_set(
    issuer: &str,
    source: &KeySource,
) -> std::result::Result<KeySet, KeySetError> {
    debug!(%issuer, %source, "Fetching JWKS");
    let content = source.read().await?;
    let key_set = parse_key_set(issuer, &content)?;
    debug!(%issuer, keys = key_set.len(), "Loaded JWKS");
    Ok(key_set)
}

/// Fetch and decode the key set of the user pool described by `config`
///
/// Performs the load every time it is called; [`crate::CognitoVerifier`]
/// keeps its own cached copy.
pub async fn load_key_set(config: &VerifierConfig) -> Result<KeySet> {
    let source = KeySource::for_config(config);
    Ok(fetch_key_set(&config.issuer(), &source).await?)
}

/// Key set of one issuer, loaded at most once
///
/// Concurrent first callers share one in-flight load. Its outcome, success
/// or failure, is kept for the lifetime of the cache: there is no TTL and no
/// refetch when a key id is missing, so rotated signing keys are only picked
/// up by building a new cache.
pub(crate) struct KeySetCache {
    issuer: String,
    source: KeySource,
    loaded: OnceCell<std::result::Result<KeySet, KeySetError>>,
}

impl KeySetCache {
    pub(crate) fn new(config: &VerifierConfig) -> Self {
        Self {
            issuer: config.issuer(),
            source: KeySource::for_config(config),
            loaded: OnceCell::new(),
        }
    }

    /// Get the key set, loading it on first use
    pub(crate) async fn get(&self) -> Result<&KeySet> {
        let loaded = self
            .loaded
            .get_or_init(|| fetch_key_set(&self.issuer, &self.source))
            .await;

        match loaded {
            Ok(key_set) => Ok(key_set),
            Err(error) => Err(error.clone().into()),
        }
    }
}
