//! # Cognito Verify
//!
//! A Rust library for verifying JWTs issued by an AWS Cognito user pool, with
//! single-flight JWKS (JSON Web Key Set) caching.
//!
//! ## Features
//!
//! - Issuer and `token_use` (`access` | `id`) checks before any cryptography
//! - JWT signature verification using RSA or EC keys from the pool's JWKS
//! - Maximum token age measured from `iat`, on top of `exp`
//! - JWKS downloaded from Cognito or read from a local file, once per verifier
//! - Classified errors that separate broken trust material from bad tokens
//!
//! ## Example
//!
//! ```rust,no_run
//! use cognito_verify::{CognitoVerifier, VerifierConfig, VerifyJwt};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VerifierConfig::new("eu-west-1", "eu-west-1_AbCdEf123", "access")?
//!         .with_token_expiration(Duration::from_secs(1800));
//!
//!     let verifier = CognitoVerifier::new(config);
//!
//!     let token = "eyJraWQiOiJhYmNkZWZnIiwiYWxnIjoiUlMyNTYifQ...";
//!     let claims = verifier.verify(token).await?;
//!
//!     println!("Subject: {:?}", claims.sub());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key rotation
//!
//! A verifier fetches the JWKS once and never refreshes it. Tokens signed with
//! a key published after that fetch fail with [`Error::UnknownKey`] until a new
//! verifier is created.

mod claims;
mod codec;
mod config;
mod error;
mod inspector;
mod key_set;
mod verifier;

// Re-exports for public API
pub use claims::Claims;
pub use codec::KeyDescriptor;
pub use codec::decode_key;
pub use config::TokenUse;
pub use config::VerifierConfig;
pub use config::VerifierSettings;
pub use error::Error;
pub use error::KeySetError;
pub use error::Result;
pub use inspector::TokenHeader;
pub use inspector::UnverifiedToken;
pub use inspector::inspect;
pub use key_set::KeySet;
pub use key_set::load_key_set;
pub use verifier::CognitoVerifier;
pub use verifier::VerifyJwt;

pub use jsonwebtoken::Algorithm;
