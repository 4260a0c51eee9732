use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// The payload of a Cognito token
///
/// Keeps every claim as it appeared in the token. Typed accessors cover the
/// claims used during validation; anything else is reachable through [`Claims::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Issuer (iss)
    pub fn iss(&self) -> Option<&str> {
        self.str_claim("iss")
    }

    /// Cognito token purpose (token_use), `access` or `id`
    pub fn token_use(&self) -> Option<&str> {
        self.str_claim("token_use")
    }

    /// Subject (sub), the user's id in the pool
    pub fn sub(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    /// Issued at (iat) as a Unix timestamp, fractional seconds truncated
    pub fn iat(&self) -> Option<i64> {
        self.numeric_date("iat")
    }

    /// Expiration time (exp) as a Unix timestamp, fractional seconds truncated
    pub fn exp(&self) -> Option<i64> {
        self.numeric_date("exp")
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A NumericDate claim; `None` when absent or not a number
    fn numeric_date(&self, name: &str) -> Option<i64> {
        let value = self.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|seconds| seconds.trunc() as i64))
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}
