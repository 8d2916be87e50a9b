/// Failure while producing a signed URL.
///
/// Each variant carries the diagnostic of the layer that rejected the input,
/// typically the message of the underlying cryptographic library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
    #[error("signing failed: {0}")]
    SigningFailure(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Failure while checking a signed URL against a public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed signed URL: {0}")]
    MalformedUrl(String),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("signature does not match policy")]
    SignatureMismatch,
    #[error("signed URL expired at {expires}")]
    Expired { expires: i64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings must provide either `pem` or `pem_file`")]
    MissingKey,
    #[error("settings provide both `pem` and `pem_file`")]
    ConflictingKey,
    #[error(transparent)]
    Config(#[from] SigningError),
}
