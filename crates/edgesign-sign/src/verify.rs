use chrono::{DateTime, Utc};
use edgesign_core::{AccessPolicy, SignatureAlgorithm, VerifyError};

use crate::encoding::decode_signature;
use crate::key::PublicKey;
use crate::sign::{PARAM_EXPIRES, PARAM_KEY_PAIR_ID, PARAM_SIGNATURE};

/// The signing parameters split off a signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParts {
    pub resource: String,
    pub expires: i64,
    pub signature: String,
    pub key_pair_id: String,
}

/// What a successful verification vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUrl {
    pub resource: String,
    pub expires: i64,
    pub key_pair_id: String,
}

/// Split a signed URL into the unsigned resource and its signing parameters.
///
/// The signing parameters are the trailing `Expires`, `Signature` and
/// `Key-Pair-Id`; everything before the separator that precedes `Expires` is
/// the resource, including any query string it already had.
pub fn parse_signed_url(url: &str) -> Result<SignedParts, VerifyError> {
    let marker = format!("{PARAM_EXPIRES}=");
    let start = url
        .rmatch_indices(&marker)
        .map(|(idx, _)| idx)
        .find(|&idx| idx > 0 && matches!(url.as_bytes()[idx - 1], b'?' | b'&'))
        .ok_or_else(|| VerifyError::MalformedUrl(format!("missing {PARAM_EXPIRES} parameter")))?;

    let resource = &url[..start - 1];
    if resource.is_empty() {
        return Err(VerifyError::MalformedUrl("missing resource".into()));
    }

    let mut expires = None;
    let mut signature = None;
    let mut key_pair_id = None;
    for pair in url[start..].split('&') {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| VerifyError::MalformedUrl(format!("parameter without value: {pair}")))?;
        let slot = match name {
            PARAM_EXPIRES => &mut expires,
            PARAM_SIGNATURE => &mut signature,
            PARAM_KEY_PAIR_ID => &mut key_pair_id,
            other => {
                return Err(VerifyError::MalformedUrl(format!(
                    "unexpected parameter after {PARAM_EXPIRES}: {other}"
                )))
            }
        };
        if slot.replace(value).is_some() {
            return Err(VerifyError::MalformedUrl(format!("duplicate parameter: {name}")));
        }
    }

    let expires = expires
        .ok_or_else(|| VerifyError::MalformedUrl(format!("missing {PARAM_EXPIRES} parameter")))?;
    let expires = expires
        .parse::<i64>()
        .map_err(|e| VerifyError::MalformedUrl(format!("invalid {PARAM_EXPIRES} '{expires}': {e}")))?;
    let signature = signature
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VerifyError::MalformedUrl(format!("missing {PARAM_SIGNATURE} parameter")))?;
    let key_pair_id = key_pair_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VerifyError::MalformedUrl(format!("missing {PARAM_KEY_PAIR_ID} parameter")))?;

    Ok(SignedParts {
        resource: resource.to_string(),
        expires,
        signature: signature.to_string(),
        key_pair_id: key_pair_id.to_string(),
    })
}

/// Check a signed URL the way the edge does: rebuild the canned policy from
/// the resource and `Expires`, verify the signature, then check expiry.
pub fn verify_signed_url(
    url: &str,
    public_key: &PublicKey,
    algorithm: SignatureAlgorithm,
    now: DateTime<Utc>,
) -> Result<VerifiedUrl, VerifyError> {
    let parts = parse_signed_url(url)?;
    let signature = decode_signature(&parts.signature)?;
    let policy = AccessPolicy::new(parts.resource.as_str(), parts.expires);

    if !public_key.verify(algorithm, policy.to_json().as_bytes(), &signature) {
        return Err(VerifyError::SignatureMismatch);
    }
    if now.timestamp() >= parts.expires {
        return Err(VerifyError::Expired {
            expires: parts.expires,
        });
    }

    Ok(VerifiedUrl {
        resource: parts.resource,
        expires: parts.expires,
        key_pair_id: parts.key_pair_id,
    })
}
