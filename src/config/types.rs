//! Default values for the rules configuration.

/// Default Git hosting sites accepted for library repositories.
pub fn default_supported_hosts() -> Vec<String> {
    vec![
        "bitbucket.org".to_string(),
        "git.antares.id".to_string(),
        "github.com".to_string(),
        "gitlab.com".to_string(),
    ]
}

/// Default organizations whose libraries get the "Arduino" type.
pub fn default_official_organizations() -> Vec<String> {
    vec![
        "github.com/arduino".to_string(),
        "github.com/arduino-libraries".to_string(),
        "github.com/bcmi-labs".to_string(),
        "github.com/vidor-libraries".to_string(),
    ]
}

/// Default organizations whose libraries get the "Partner" type.
pub fn default_partner_organizations() -> Vec<String> {
    vec![
        "github.com/Azure".to_string(),
        "github.com/ms-iot".to_string(),
        "github.com/ameltech".to_string(),
    ]
}

/// Default organizations whose libraries get the "Recommended" type.
pub fn default_recommended_organizations() -> Vec<String> {
    vec!["github.com/adafruit".to_string()]
}

// Default value functions for serde
pub(crate) fn default_main_host() -> String {
    "github.com".to_string()
}
pub(crate) fn default_indexer_logs_base() -> String {
    "http://downloads.arduino.cc/libraries/logs".to_string()
}
pub(crate) fn default_metadata_file() -> String {
    "library.properties".to_string()
}
