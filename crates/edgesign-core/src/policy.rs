use chrono::{DateTime, Utc};
use serde_json::json;

use crate::errors::SigningError;

/// Canned access policy: one resource, one `DateLessThan` condition.
///
/// The serialized form is what gets signed, so it must match the CDN's
/// policy document byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    resource: String,
    expires: i64,
}

impl AccessPolicy {
    pub fn new(resource: impl Into<String>, expires: i64) -> Self {
        Self {
            resource: resource.into(),
            expires,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Absolute expiry in UNIX epoch seconds.
    pub fn expires(&self) -> i64 {
        self.expires
    }

    /// Compact JSON policy document.
    ///
    /// Key order depends on serde_json's `preserve_order` feature.
    pub fn to_json(&self) -> String {
        json!({
            "Statement": [{
                "Resource": self.resource,
                "Condition": {
                    "DateLessThan": {
                        "AWS:EpochTime": self.expires
                    }
                }
            }]
        })
        .to_string()
    }
}

/// Compute the absolute expiry for a URL signed at `now`.
pub fn expires_at(now: DateTime<Utc>, lifetime_seconds: i64) -> Result<i64, SigningError> {
    if lifetime_seconds <= 0 {
        return Err(SigningError::InvalidConfiguration(format!(
            "lifetime must be positive, got {lifetime_seconds} seconds"
        )));
    }
    now.timestamp()
        .checked_add(lifetime_seconds)
        .ok_or_else(|| SigningError::InvalidConfiguration("expiry overflows epoch seconds".into()))
}
