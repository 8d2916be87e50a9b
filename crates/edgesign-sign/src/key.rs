use std::fmt;

use edgesign_core::{SignatureAlgorithm, SigningError, VerifyError};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;

/// RSA private key used to sign policy documents.
#[derive(Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Parse PEM text in PKCS#1 (`BEGIN RSA PRIVATE KEY`) or PKCS#8
    /// (`BEGIN PRIVATE KEY`) form.
    pub fn from_pem(pem: &str) -> Result<Self, SigningError> {
        let pem = pem.trim();
        if pem.is_empty() {
            return Err(SigningError::InvalidKeyMaterial("empty PEM".into()));
        }

        let inner = if pem.contains("BEGIN RSA PRIVATE KEY") {
            RsaPrivateKey::from_pkcs1_pem(pem)
                .map_err(|e| SigningError::InvalidKeyMaterial(e.to_string()))?
        } else if pem.contains("BEGIN PRIVATE KEY") {
            RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| SigningError::InvalidKeyMaterial(e.to_string()))?
        } else {
            return Err(SigningError::InvalidKeyMaterial(
                "unsupported key format, expected RSA private key PEM (PKCS#1 or PKCS#8)".into(),
            ));
        };

        Ok(Self { inner })
    }

    /// RSASSA-PKCS1-v1_5 signature over `message`.
    pub fn sign(
        &self,
        algorithm: SignatureAlgorithm,
        message: &[u8],
    ) -> Result<Vec<u8>, SigningError> {
        let result = match algorithm {
            SignatureAlgorithm::RsaSha1 => {
                let digest = Sha1::digest(message);
                self.inner.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
            }
            SignatureAlgorithm::RsaSha256 => {
                let digest = Sha256::digest(message);
                self.inner.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            }
        };
        result.map_err(|e| SigningError::SigningFailure(e.to_string()))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    pub fn bits(&self) -> usize {
        self.inner.size() * 8
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// RSA public key registered with the CDN, used to check signed URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: RsaPublicKey,
}

impl PublicKey {
    /// Parse SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`) or PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`) PEM text.
    pub fn from_pem(pem: &str) -> Result<Self, VerifyError> {
        let pem = pem.trim();
        let inner = if pem.contains("BEGIN RSA PUBLIC KEY") {
            RsaPublicKey::from_pkcs1_pem(pem)
                .map_err(|e| VerifyError::InvalidPublicKey(e.to_string()))?
        } else if pem.contains("BEGIN PUBLIC KEY") {
            RsaPublicKey::from_public_key_pem(pem)
                .map_err(|e| VerifyError::InvalidPublicKey(e.to_string()))?
        } else {
            return Err(VerifyError::InvalidPublicKey(
                "unsupported key format, expected RSA public key PEM".into(),
            ));
        };
        Ok(Self { inner })
    }

    /// True when `signature` is a valid signature of `message`.
    pub fn verify(&self, algorithm: SignatureAlgorithm, message: &[u8], signature: &[u8]) -> bool {
        let result = match algorithm {
            SignatureAlgorithm::RsaSha1 => {
                let digest = Sha1::digest(message);
                self.inner
                    .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, signature)
            }
            SignatureAlgorithm::RsaSha256 => {
                let digest = Sha256::digest(message);
                self.inner
                    .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            }
        };
        result.is_ok()
    }
}
