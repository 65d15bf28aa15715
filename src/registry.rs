//! The line-delimited registry of library repository URLs.

use crate::error::{GateError, Result};
use crate::registry_url::{NormalizedUrl, ParsedUrl, normalize};
use std::path::Path;

/// Normalized form of every URL already in the registry, in file order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    urls: Vec<NormalizedUrl>,
}

impl Registry {
    /// Read and normalize the registry file.
    ///
    /// # Returns
    ///
    /// * `Ok(Registry)` - All lines normalized
    /// * `Err(GateError::UserError)` - The file could not be read
    /// * `Err(GateError::InputError)` - A line is not a URL
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GateError::UserError(format!(
                "failed to read list file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_lines(content.lines())
    }

    /// Normalize registry lines. Blank lines are skipped.
    ///
    /// Every line has been through review before, so one that does not parse
    /// means the registry itself is corrupt.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut urls = Vec::new();
        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            let parsed = ParsedUrl::parse(line).map_err(|e| {
                GateError::InputError(format!("registry line {} is not a URL: {}", index + 1, e))
            })?;
            urls.push(normalize(&parsed));
        }

        Ok(Self { urls })
    }

    /// Whether the registry already holds `url` (structural equality).
    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        self.urls.iter().any(|existing| existing == url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
