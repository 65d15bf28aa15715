//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Rules applied to every submission.
///
/// Organization entries are `host[/path]` prefixes matched with
/// [`crate::registry_url::is_under`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Hosting
    // =========================================================================
    /// Git hosting sites accepted for library repositories.
    #[serde(default = "default_supported_hosts")]
    pub supported_hosts: Vec<String>,

    /// Host of the platform submitters' account names belong to.
    #[serde(default = "default_main_host")]
    pub main_host: String,

    // =========================================================================
    // Library types
    // =========================================================================
    /// Organizations producing "Arduino" (official) libraries.
    #[serde(default = "default_official_organizations")]
    pub official_organizations: Vec<String>,

    /// Organizations producing "Partner" libraries.
    #[serde(default = "default_partner_organizations")]
    pub partner_organizations: Vec<String>,

    /// Organizations producing "Recommended" libraries.
    #[serde(default = "default_recommended_organizations")]
    pub recommended_organizations: Vec<String>,

    // =========================================================================
    // Report
    // =========================================================================
    /// Base URL of the indexer logs listed in the report.
    #[serde(default = "default_indexer_logs_base")]
    pub indexer_logs_base: String,

    /// Metadata file expected at the root of a library repository.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supported_hosts: default_supported_hosts(),
            main_host: default_main_host(),
            official_organizations: default_official_organizations(),
            partner_organizations: default_partner_organizations(),
            recommended_organizations: default_recommended_organizations(),
            indexer_logs_base: default_indexer_logs_base(),
            metadata_file: default_metadata_file(),
        }
    }
}
