use chrono::{DateTime, Utc};
use edgesign_core::{SigningConfig, SigningError};
use edgesign_sign::{sign, SignedUrl};

/// What to hand the page when signing fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Propagate the error.
    #[default]
    Deny,
    /// Serve the unsigned resource URL. The edge will refuse it if the
    /// distribution requires signed URLs.
    Unsigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOutcome {
    Signed(SignedUrl),
    Unsigned(String),
}

impl SigningOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            SigningOutcome::Signed(url) => url.as_str(),
            SigningOutcome::Unsigned(url) => url,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, SigningOutcome::Signed(_))
    }
}

/// Sign `resource`, degrading to the unsigned URL only under
/// [`Fallback::Unsigned`].
///
/// Only key and signing failures degrade. A configuration error (empty
/// resource, bad lifetime or key-pair id) is returned under either policy.
pub fn sign_or_fallback(
    resource: &str,
    config: &SigningConfig,
    now: DateTime<Utc>,
    fallback: Fallback,
) -> Result<SigningOutcome, SigningError> {
    match sign(resource, config, now) {
        Ok(url) => {
            tracing::debug!(
                resource,
                expires = url.expires(),
                key_pair_id = %config.key_pair_id,
                "signed resource URL"
            );
            Ok(SigningOutcome::Signed(url))
        }
        Err(err @ SigningError::InvalidConfiguration(_)) => Err(err),
        Err(err) => match fallback {
            Fallback::Deny => Err(err),
            Fallback::Unsigned => {
                tracing::warn!(resource, error = %err, "signing failed, serving unsigned URL");
                Ok(SigningOutcome::Unsigned(resource.to_string()))
            }
        },
    }
}
