use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::domain::tag::DEFAULT_TAG_TEMPLATE;
use crate::domain::DEFAULT_PATTERN;
use crate::error::{BundleError, Result};
use crate::resolver::HistoryMode;
use crate::store::RecordedRelease;

/// Name of the configuration file looked up in the repository root
pub const CONFIG_FILE_NAME: &str = "sqlbundle.toml";

/// Represents the complete configuration for sqlbundle.
///
/// Every field has a default, so an empty file is a valid configuration.
/// Command-line flags override whatever is loaded here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Glob selecting which touched files are bundled
    #[serde(default = "default_code_pattern")]
    pub code_pattern: String,

    /// Directory, relative to the repository root, that receives bundles
    #[serde(default = "default_releases_relpath")]
    pub releases_relpath: String,

    /// Key under which release metadata is held on the database
    #[serde(default = "default_release_type")]
    pub release_type: String,

    /// Template for the label part of the bundle name
    #[serde(default = "default_tag_template")]
    pub tag_template: String,

    #[serde(default)]
    pub history: HistoryMode,

    /// Last release applied per database, keyed by `server/database`
    #[serde(default)]
    pub databases: BTreeMap<String, RecordedRelease>,
}

fn default_code_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_releases_relpath() -> String {
    "releases".to_string()
}

fn default_release_type() -> String {
    "gplan-cas".to_string()
}

fn default_tag_template() -> String {
    DEFAULT_TAG_TEMPLATE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            code_pattern: default_code_pattern(),
            releases_relpath: default_releases_relpath(),
            release_type: default_release_type(),
            tag_template: default_tag_template(),
            history: HistoryMode::default(),
            databases: BTreeMap::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `sqlbundle.toml` in the repository directory
/// 3. `.sqlbundle.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_dir` - Repository directory searched for `sqlbundle.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>, repo_dir: &Path) -> Result<Config> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let repo_config = repo_dir.join(CONFIG_FILE_NAME);
    if repo_config.exists() {
        return read_config(&repo_config);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_config.exists() {
            return read_config(&user_config);
        }
    }

    debug!("No configuration file found; using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "Loading configuration");
    let config_str = fs::read_to_string(path).map_err(|e| {
        BundleError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| BundleError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| BundleError::config(e.to_string()))
}
