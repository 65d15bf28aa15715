//! Reader for `library.properties` metadata files.
//!
//! The format is line-based `key=value`. Blank lines and lines starting with
//! `#` or `!` are ignored, and whitespace around keys and values is trimmed.

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Why a properties file could not be read.
#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line format on line {line_number}, should be 'key=value': '{line}'")]
    InvalidLine { line_number: usize, line: String },
}

/// Parsed key/value pairs of a properties file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    /// Load and parse a properties file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PropertiesError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PropertiesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse properties from a string. Later duplicates override earlier ones.
    pub fn parse(content: &str) -> Result<Self, PropertiesError> {
        let mut values = BTreeMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(PropertiesError::InvalidLine {
                    line_number: index + 1,
                    line: line.to_string(),
                });
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { values })
    }

    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}
