#![forbid(unsafe_code)]
//! Canned-policy signing of CDN resource URLs.
//!
//! [`sign`] builds the policy document for a resource, signs it with the
//! configured RSA key and appends `Expires`, `Signature` and `Key-Pair-Id` to
//! the URL. [`verify::verify_signed_url`] performs the inverse check with the
//! matching public key.

pub mod encoding;
pub mod key;
pub mod sign;
pub mod verify;

pub use key::{PrivateKey, PublicKey};
pub use sign::{sign, SignedUrl, Signer};
pub use verify::{parse_signed_url, verify_signed_url, SignedParts, VerifiedUrl};
