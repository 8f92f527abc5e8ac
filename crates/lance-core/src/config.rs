//! User configuration and data-directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Contents of `<config dir>/lance/config.toml`. Every field is optional;
/// a missing file means all defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Where snapshots live. Defaults to the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub timer: TimerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Seconds between watch-loop ticks.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
        }
    }
}

const fn default_tick_secs() -> u64 {
    1
}

/// Load the user config, or defaults when no file exists.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("lance/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the data directory: `LANCE_DATA` env, then config, then the
/// platform data directory.
#[must_use]
pub fn resolve_data_dir(config: &UserConfig) -> PathBuf {
    resolve_data_dir_inner(env::var("LANCE_DATA").ok().as_deref(), config)
}

fn resolve_data_dir_inner(env_dir: Option<&str>, config: &UserConfig) -> PathBuf {
    if let Some(dir) = env_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = &config.data_dir {
        return dir.clone();
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lance")
}

#[cfg(test)]
mod tests {
    use super::{TimerConfig, UserConfig, resolve_data_dir_inner};
    use std::path::PathBuf;

    #[test]
    fn defaults_are_stable() {
        let config = UserConfig::default();
        assert!(config.data_dir.is_none());
        assert!(config.output.is_none());
        assert_eq!(config.timer.tick_secs, 1);
    }

    #[test]
    fn parses_a_full_config_file() {
        let content = r#"
data_dir = "/home/alice/.lance"
output = "json"

[timer]
tick_secs = 5
"#;
        let config: UserConfig = toml::from_str(content).expect("parse config");
        assert_eq!(config.data_dir, Some(PathBuf::from("/home/alice/.lance")));
        assert_eq!(config.output.as_deref(), Some("json"));
        assert_eq!(config.timer.tick_secs, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: UserConfig = toml::from_str("output = \"text\"").expect("parse config");
        assert_eq!(config.output.as_deref(), Some("text"));
        assert_eq!(config.timer.tick_secs, 1);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(toml::from_str::<UserConfig>("data_dir = [").is_err());
    }

    #[test]
    fn env_wins_over_config_for_data_dir() {
        let config = UserConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..UserConfig::default()
        };

        let resolved = resolve_data_dir_inner(Some("/from/env"), &config);
        assert_eq!(resolved, PathBuf::from("/from/env"));

        let resolved = resolve_data_dir_inner(None, &config);
        assert_eq!(resolved, PathBuf::from("/from/config"));

        // Empty env value is treated as unset.
        let resolved = resolve_data_dir_inner(Some(""), &config);
        assert_eq!(resolved, PathBuf::from("/from/config"));
    }

    #[test]
    fn timer_config_round_trips_through_toml() {
        let timer = TimerConfig { tick_secs: 3 };
        let rendered = toml::to_string(&timer).expect("render timer config");
        let reparsed: TimerConfig = toml::from_str(&rendered).expect("reparse");
        assert_eq!(reparsed.tick_secs, 3);
    }
}
