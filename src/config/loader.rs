//! Configuration loading from the embedded defaults and an optional override file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::settings::Settings;

/// Built-in defaults, always loaded first. `http.server` is intentionally
/// absent: an unset transport name selects the factory's registered default.
const DEFAULT_SETTINGS: &str = r#"
[http]
host = "0.0.0.0"
port = 8801
request_timeout_secs = 30

[metrics]
enabled = false
address = "127.0.0.1:9100"
"#;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings built from the embedded defaults only.
pub fn builtin() -> Settings {
    Settings::new(parse_layer(DEFAULT_SETTINGS).expect("embedded defaults must parse"), HashMap::new())
}

/// Load settings: embedded defaults, then the override file when a path is given.
///
/// A `None` path is not an error. A supplied path that cannot be read or
/// parsed is; callers decide whether that is fatal.
pub fn load(override_path: Option<&Path>) -> Result<Settings, ConfigError> {
    let defaults = parse_layer(DEFAULT_SETTINGS).expect("embedded defaults must parse");

    let overrides = match override_path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_layer(&content)?
        }
        None => HashMap::new(),
    };

    Ok(Settings::new(defaults, overrides))
}

/// Parse one TOML source into a flat `key.path → string` map.
fn parse_layer(content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let table: toml::Table = content.parse().map_err(ConfigError::Parse)?;
    let mut out = HashMap::new();
    flatten(&table, "", &mut out);
    Ok(out)
}

/// Flatten nested tables into dot-joined keys. Scalars keep their natural
/// string form; arrays and datetimes keep their TOML rendering so unknown
/// keys survive the round trip for consumers that recognize them.
fn flatten(table: &toml::Table, prefix: &str, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::Table(nested) => flatten(nested, &full, out),
            toml::Value::String(s) => {
                out.insert(full, s.clone());
            }
            other => {
                out.insert(full, other.to_string());
            }
        }
    }
}
