use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SigningError;

/// Signature scheme applied to the policy document.
///
/// CloudFront canned policies require RSA over SHA-1. Other CDNs that share
/// the URL layout may mandate SHA-256 instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    #[default]
    RsaSha1,
    RsaSha256,
}

impl SignatureAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureAlgorithm::RsaSha1 => "rsa-sha1",
            SignatureAlgorithm::RsaSha256 => "rsa-sha256",
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rsa-sha1" => Ok(SignatureAlgorithm::RsaSha1),
            "rsa-sha256" => Ok(SignatureAlgorithm::RsaSha256),
            other => Err(format!(
                "unknown algorithm '{other}' (use: rsa-sha1, rsa-sha256)"
            )),
        }
    }
}

/// Everything a single signing operation needs.
///
/// The private key stays PEM text owned by the caller; it is parsed when a
/// signer is built from this config and never stored elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub private_key: String,
    pub key_pair_id: String,
    pub lifetime_seconds: i64,
    pub algorithm: SignatureAlgorithm,
}

impl SigningConfig {
    pub fn new(
        private_key: impl Into<String>,
        key_pair_id: impl Into<String>,
        lifetime_seconds: i64,
    ) -> Self {
        Self {
            private_key: private_key.into(),
            key_pair_id: key_pair_id.into(),
            lifetime_seconds,
            algorithm: SignatureAlgorithm::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Check the non-cryptographic fields. Key material is checked on parse.
    pub fn validate(&self) -> Result<(), SigningError> {
        if self.lifetime_seconds <= 0 {
            return Err(SigningError::InvalidConfiguration(format!(
                "lifetime must be positive, got {} seconds",
                self.lifetime_seconds
            )));
        }
        if self.key_pair_id.trim().is_empty() {
            return Err(SigningError::InvalidConfiguration(
                "key pair id must not be empty".into(),
            ));
        }
        // Embedded verbatim as a query value.
        if let Some(c) = self
            .key_pair_id
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '&' | '=' | '?' | '#'))
        {
            return Err(SigningError::InvalidConfiguration(format!(
                "key pair id contains reserved character {c:?}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("private_key", &"<redacted>")
            .field("key_pair_id", &self.key_pair_id)
            .field("lifetime_seconds", &self.lifetime_seconds)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
