use std::fmt;

use chrono::{DateTime, Utc};
use edgesign_core::policy::{expires_at, AccessPolicy};
use edgesign_core::{SignatureAlgorithm, SigningConfig, SigningError};

use crate::encoding::encode_signature;
use crate::key::PrivateKey;

pub const PARAM_EXPIRES: &str = "Expires";
pub const PARAM_SIGNATURE: &str = "Signature";
pub const PARAM_KEY_PAIR_ID: &str = "Key-Pair-Id";

/// A resource URL carrying a canned-policy signature.
///
/// Only valid until [`SignedUrl::expires`]; the edge refuses it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: String,
    expires: i64,
    signature: String,
}

impl SignedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// The encoded `Signature` query value.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<SignedUrl> for String {
    fn from(signed: SignedUrl) -> Self {
        signed.url
    }
}

/// Signs resource URLs with a key parsed once up front.
///
/// Holds no mutable state; share it across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Signer {
    key: PrivateKey,
    key_pair_id: String,
    lifetime_seconds: i64,
    algorithm: SignatureAlgorithm,
}

impl Signer {
    pub fn from_config(config: &SigningConfig) -> Result<Self, SigningError> {
        config.validate()?;
        let key = PrivateKey::from_pem(&config.private_key)?;
        Ok(Self {
            key,
            key_pair_id: config.key_pair_id.clone(),
            lifetime_seconds: config.lifetime_seconds,
            algorithm: config.algorithm,
        })
    }

    pub fn key_pair_id(&self) -> &str {
        &self.key_pair_id
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn sign_url(&self, resource: &str, now: DateTime<Utc>) -> Result<SignedUrl, SigningError> {
        if resource.is_empty() {
            return Err(SigningError::InvalidConfiguration(
                "resource must not be empty".into(),
            ));
        }

        let expires = expires_at(now, self.lifetime_seconds)?;
        let policy = AccessPolicy::new(resource, expires);
        let raw = self.key.sign(self.algorithm, policy.to_json().as_bytes())?;
        let signature = encode_signature(&raw);

        let separator = if resource.contains('?') { '&' } else { '?' };
        let url = format!(
            "{resource}{separator}{PARAM_EXPIRES}={expires}&{PARAM_SIGNATURE}={signature}&{PARAM_KEY_PAIR_ID}={}",
            self.key_pair_id
        );

        Ok(SignedUrl {
            url,
            expires,
            signature,
        })
    }
}

/// Sign `resource` with a canned policy expiring `config.lifetime_seconds`
/// after `now`.
pub fn sign(
    resource: &str,
    config: &SigningConfig,
    now: DateTime<Utc>,
) -> Result<SignedUrl, SigningError> {
    Signer::from_config(config)?.sign_url(resource, now)
}
