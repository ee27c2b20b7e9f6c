mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::rules::RuleSet;

/// Get the config directory path (~/.config/race-standings/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("race-standings"))
}

/// Get the default config file path (~/.config/race-standings/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/race-standings/config.yaml) and falls back to built-in
///   defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

impl Config {
    /// The rule set this config selects (the standard preset when unset).
    pub fn rule_set(&self) -> Result<RuleSet> {
        match self.rules {
            Some(ref rules) => rules.resolve(),
            None => Ok(RuleSet::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_path_errors() {
        let temp_path = env::temp_dir().join("race_standings_missing_config.yaml");
        let _ = fs::remove_file(&temp_path);

        let err = load_config(Some(temp_path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_file() {
        let temp_path = env::temp_dir().join("race_standings_test_config.yaml");
        fs::write(
            &temp_path,
            "rules:\n  preset: heavy\n  excluded_drivers: [40, 41]\n",
        )
        .unwrap();

        let config = load_config(Some(temp_path.clone())).unwrap();
        let rules = config.rule_set().unwrap();
        assert_eq!(rules.name, "heavy");
        assert_eq!(rules.excluded_drivers, vec![40, 41]);

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_invalid_yaml_errors() {
        let temp_path = env::temp_dir().join("race_standings_bad_config.yaml");
        fs::write(&temp_path, "rules: [not, a, map]\n").unwrap();

        let err = load_config(Some(temp_path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&temp_path);
    }

    #[test]
    fn test_default_config_uses_standard_rules() {
        let rules = Config::default().rule_set().unwrap();
        assert_eq!(rules, RuleSet::standard());
    }
}
