use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{SettingsError, SigningError};
use crate::types::{SignatureAlgorithm, SigningConfig};

/// Persisted signing settings as an external settings store supplies them.
///
/// Lifetime is stored in minutes; [`Settings::to_signing_config`] converts
/// it to the seconds the signer works with.
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pem_file: Option<PathBuf>,
    pub key_pair_id: String,
    pub lifetime_minutes: i64,
    #[serde(default)]
    pub algorithm: SignatureAlgorithm,
}

impl Settings {
    /// Parse settings JSON. A relative `pem_file` resolves against `base_dir`.
    pub fn from_json(content: &str, base_dir: &Path) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(content)?;
        match (&settings.pem, &settings.pem_file) {
            (Some(_), Some(_)) => return Err(SettingsError::ConflictingKey),
            (None, None) => return Err(SettingsError::MissingKey),
            (None, Some(file)) => {
                let path = base_dir.join(file);
                let pem = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                settings.pem = Some(pem);
            }
            (Some(_), None) => {}
        }
        Ok(settings)
    }

    pub fn lifetime_seconds(&self) -> Result<i64, SigningError> {
        self.lifetime_minutes.checked_mul(60).ok_or_else(|| {
            SigningError::InvalidConfiguration(format!(
                "lifetime of {} minutes overflows seconds",
                self.lifetime_minutes
            ))
        })
    }

    pub fn to_signing_config(&self) -> Result<SigningConfig, SettingsError> {
        let pem = self.pem.clone().ok_or(SettingsError::MissingKey)?;
        let config = SigningConfig::new(pem, self.key_pair_id.clone(), self.lifetime_seconds()?)
            .with_algorithm(self.algorithm);
        config.validate()?;
        Ok(config)
    }

    /// Settings as JSON with the key material replaced.
    pub fn redacted(&self) -> Value {
        let pem = if self.pem.is_some() {
            "<redacted>"
        } else {
            "<missing>"
        };
        let mut out = json!({
            "key_pair_id": self.key_pair_id,
            "lifetime_minutes": self.lifetime_minutes,
            "algorithm": self.algorithm,
            "pem": pem,
        });
        if let Some(file) = &self.pem_file {
            out["pem_file"] = json!(file.display().to_string());
        }
        out
    }
}

/// Load a settings file from disk.
pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    Settings::from_json(&content, base_dir)
}
