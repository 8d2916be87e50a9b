#![forbid(unsafe_code)]

pub mod errors;
pub mod policy;
pub mod settings;
pub mod types;

pub use errors::{SettingsError, SigningError, VerifyError};
pub use policy::AccessPolicy;
pub use settings::Settings;
pub use types::{SignatureAlgorithm, SigningConfig};
