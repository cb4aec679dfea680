use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::request::DEFAULT_EXTENSIONS;

/// Settings read from an optional `TagCounter.*` file and `TAG_COUNTER_*`
/// environment variables. Command-line flags override these.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub extensions: Vec<String>,
    /// Per-file listing shows every file up to this many.
    pub listing_limit: usize,
    /// Files shown when the listing is truncated.
    pub listing_head: usize,
    pub debug_sample_size: usize,
    pub show_progress: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            listing_limit: 20,
            listing_head: 10,
            debug_sample_size: 15,
            show_progress: false,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    load_from("TagCounter")
}

/// Load from the named config file (extension optional) plus the environment.
pub fn load_from(file_name: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(file_name).required(false))
        .add_source(
            Environment::with_prefix("TAG_COUNTER")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
