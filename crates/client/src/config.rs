//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one headless battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scenario RON file, or the name of a bundled scenario.
    pub scenario: Option<String>,
    /// Battle config TOML file.
    pub config_path: Option<PathBuf>,
    pub max_turns: usize,
    /// Directory for the log file. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
    /// Time each visual effect is held for.
    pub effect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scenario: None,
            config_path: None,
            max_turns: 200,
            log_dir: None,
            effect_delay: Duration::ZERO,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_SCENARIO` - scenario file or bundled scenario name (default: built-in skirmish)
    /// - `TACTICS_CONFIG` - battle config TOML file (default: bundled config)
    /// - `TACTICS_MAX_TURNS` - turn cap for the run (default: 200)
    /// - `TACTICS_LOG_DIR` - directory for `tactics.log`
    /// - `TACTICS_EFFECT_DELAY_MS` - per-effect delay in milliseconds (default: 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        config.scenario = read("TACTICS_SCENARIO");
        config.config_path = read("TACTICS_CONFIG").map(PathBuf::from);
        config.log_dir = read("TACTICS_LOG_DIR").map(PathBuf::from);

        if let Some(turns) = read("TACTICS_MAX_TURNS").and_then(|v| v.trim().parse().ok()) {
            config.max_turns = turns;
        }
        if let Some(ms) = read("TACTICS_EFFECT_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            config.effect_delay = Duration::from_millis(ms);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(ClientConfig::from_lookup(lookup(&[])), ClientConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TACTICS_SCENARIO", "skirmish"),
            ("TACTICS_CONFIG", "/etc/tactics/config.toml"),
            ("TACTICS_MAX_TURNS", "50"),
            ("TACTICS_LOG_DIR", "/tmp/tactics"),
            ("TACTICS_EFFECT_DELAY_MS", "25"),
        ]));
        assert_eq!(config.scenario.as_deref(), Some("skirmish"));
        assert_eq!(
            config.config_path,
            Some(PathBuf::from("/etc/tactics/config.toml"))
        );
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/tactics")));
        assert_eq!(config.effect_delay, Duration::from_millis(25));
    }

    #[test]
    fn malformed_numbers_keep_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TACTICS_MAX_TURNS", "many"),
            ("TACTICS_EFFECT_DELAY_MS", "-3"),
            ("TACTICS_SCENARIO", "  "),
        ]));
        assert_eq!(config, ClientConfig::default());
    }
}
