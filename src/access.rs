//! Access control for registry requests.
//!
//! The access list is an ordered YAML sequence of entries, each granting an
//! account on a host one of three levels. Evaluation is a pure scan over the
//! borrowed list:
//! - the submitter's level comes from the first entry on the main host whose
//!   name matches exactly (default: [`AccessLevel::Default`])
//! - a repository is refused when its URL lies under the `host/name` slug of
//!   any `deny` entry, unless the submitter has `allow` access

use crate::error::{GateError, Result};
use crate::registry_url::{NormalizedUrl, is_under};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Unrestricted: may submit even repositories of denied owners.
    Allow,
    /// May submit as long as the repository owner is not denied.
    #[default]
    Default,
    /// May not submit, and repositories they own may not be registered.
    Deny,
}

/// One entry of the access control list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    pub access: AccessLevel,
    /// Account host (e.g. `github.com`).
    pub host: String,
    /// User or organization account name.
    pub name: String,
    /// URL with more information about the entry.
    #[serde(default)]
    pub reference: String,
}

impl AccessEntry {
    /// The `host/name` slug identifying the account.
    pub fn owner_slug(&self) -> String {
        format!("{}/{}", self.host, self.name)
    }
}

/// Load the access control list from a YAML file.
///
/// # Returns
///
/// * `Ok(Vec<AccessEntry>)` - Entries in file order
/// * `Err(GateError::UserError)` - The file could not be read
/// * `Err(GateError::InputError)` - The file is not a valid access list
pub fn load_access_list<P: AsRef<Path>>(path: P) -> Result<Vec<AccessEntry>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        GateError::UserError(format!(
            "failed to read access control file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_access_list(&content)
}

/// Parse an access control list from a YAML string.
pub fn parse_access_list(yaml: &str) -> Result<Vec<AccessEntry>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_yaml::from_str(yaml).map_err(|e| {
        GateError::InputError(format!(
            "Access control file has invalid format:\n\n{}",
            e
        ))
    })
}

/// Find the entry governing `submitter` on `main_host`.
///
/// Names are compared case-sensitively and the first match wins.
pub fn find_submitter_entry<'a>(
    access_list: &'a [AccessEntry],
    main_host: &str,
    submitter: &str,
) -> Option<&'a AccessEntry> {
    access_list
        .iter()
        .find(|entry| entry.host == main_host && entry.name == submitter)
}

/// Resolve the access level of `submitter`.
pub fn submitter_access(access_list: &[AccessEntry], main_host: &str, submitter: &str) -> AccessLevel {
    find_submitter_entry(access_list, main_host, submitter)
        .map(|entry| entry.access)
        .unwrap_or_default()
}

/// Find the first `deny` entry whose account owns `url`.
pub fn owner_denial<'a>(access_list: &'a [AccessEntry], url: &NormalizedUrl) -> Option<&'a AccessEntry> {
    access_list
        .iter()
        .filter(|entry| entry.access == AccessLevel::Deny)
        .find(|entry| is_under(url, &[entry.owner_slug()]))
}

/// Message for a submitter whose own privileges were revoked.
pub fn submitter_revoked_message(submitter: &str, entry: &AccessEntry) -> String {
    format!(
        "Library registry privileges for @{} have been revoked.%0ASee: {}",
        submitter, entry.reference
    )
}

/// Message for a repository whose owner's privileges were revoked.
pub fn owner_revoked_message(entry: &AccessEntry) -> String {
    format!(
        "Library registry privileges for library repository owner `{}` have been revoked.%0ASee: {}",
        entry.owner_slug(),
        entry.reference
    )
}
