//! Config loading and validation.

use super::model::Config;
use crate::error::{GateError, Result};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(GateError::UserError)` - The file could not be read
    /// * `Err(GateError::InputError)` - Parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            GateError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document for a struct; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| GateError::InputError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `main_host` must be non-empty
    /// - `supported_hosts` must be non-empty
    /// - no host or organization entry may be empty
    pub fn validate(&self) -> Result<()> {
        if self.main_host.trim().is_empty() {
            return Err(GateError::InputError(
                "config validation failed: main_host must be non-empty".to_string(),
            ));
        }

        if self.supported_hosts.is_empty() {
            return Err(GateError::InputError(
                "config validation failed: supported_hosts must list at least one host"
                    .to_string(),
            ));
        }

        let lists = [
            ("supported_hosts", &self.supported_hosts),
            ("official_organizations", &self.official_organizations),
            ("partner_organizations", &self.partner_organizations),
            ("recommended_organizations", &self.recommended_organizations),
        ];
        for (name, entries) in lists {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                return Err(GateError::InputError(format!(
                    "config validation failed: {} entries must be non-empty",
                    name
                )));
            }
        }

        Ok(())
    }
}
