//! Client configuration sourced from the environment.
use std::env;
use std::path::PathBuf;

use waltz_core::BattleConfig;

/// Settings a `.env` file or the shell can provide.
///
/// Command-line flags take precedence over every field here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Seed for drafting, AI decisions and the battle's random source.
    pub seed: Option<u64>,
    /// Start every combatant with full EP.
    pub fill_ep: bool,
    pub round_limit: Option<u32>,
    /// Directory holding `battle.toml` and the RON catalogs.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WALTZ_SEED` - Seed for every random source (default: entropy)
    /// - `WALTZ_FILL_EP` - `true`/`1` starts everyone at full EP (default: false)
    /// - `WALTZ_ROUND_LIMIT` - Rounds before the battle is called a draw
    /// - `WALTZ_DATA_DIR` - Catalog directory (default: embedded catalog)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_var::<u64>(&lookup, "WALTZ_SEED") {
            config.seed = Some(seed);
        }
        if let Some(flag) = lookup("WALTZ_FILL_EP") {
            config.fill_ep = parse_flag(&flag);
        }
        if let Some(limit) = read_var::<u32>(&lookup, "WALTZ_ROUND_LIMIT") {
            config.round_limit = (limit > 0).then_some(limit);
        }
        if let Some(dir) = lookup("WALTZ_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Folds the client knobs into a loaded [`BattleConfig`].
    pub fn apply(&self, battle: &mut BattleConfig) {
        if self.fill_ep {
            battle.fill_ep_on_start = true;
        }
        if let Some(limit) = self.round_limit {
            battle.round_limit = Some(limit);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), ClientConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("WALTZ_SEED", "42"),
            ("WALTZ_FILL_EP", "TRUE"),
            ("WALTZ_ROUND_LIMIT", " 30 "),
            ("WALTZ_DATA_DIR", "/tmp/waltz"),
        ]);

        assert_eq!(config.seed, Some(42));
        assert!(config.fill_ep);
        assert_eq!(config.round_limit, Some(30));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/waltz")));
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = config_from(&[
            ("WALTZ_SEED", "-3"),
            ("WALTZ_FILL_EP", "maybe"),
            ("WALTZ_ROUND_LIMIT", "0"),
            ("WALTZ_DATA_DIR", ""),
        ]);

        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn apply_only_overrides_what_is_set() {
        let mut battle = BattleConfig::default().with_round_limit(80);
        ClientConfig::default().apply(&mut battle);
        assert_eq!(battle.round_limit, Some(80));
        assert!(!battle.fill_ep_on_start);

        let client = ClientConfig {
            fill_ep: true,
            round_limit: Some(12),
            ..ClientConfig::default()
        };
        client.apply(&mut battle);
        assert_eq!(battle.round_limit, Some(12));
        assert!(battle.fill_ep_on_start);
    }
}
