//! Loading [`GuardConfig`] from JSON and the environment.

use super::GuardConfig;
use crate::errors::ConfigError;
use std::path::Path;
use std::str::FromStr;

/// Overrides `timeout.timeout_ms`.
pub const ENV_TIMEOUT_MS: &str = "OPGUARD_TIMEOUT_MS";
/// Overrides `retry.max_retries`.
pub const ENV_MAX_RETRIES: &str = "OPGUARD_MAX_RETRIES";
/// Overrides `retry.delay_ms`.
pub const ENV_RETRY_DELAY_MS: &str = "OPGUARD_RETRY_DELAY_MS";
/// Overrides `label`.
pub const ENV_LABEL: &str = "OPGUARD_LABEL";

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        name: name.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

impl GuardConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Builds a config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env_with(|name| std::env::var(name).ok())
    }

    /// Applies environment overrides on top of this config.
    ///
    /// `lookup` resolves a variable name to its value.
    pub fn merge_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout.timeout_ms = parse_var(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_RETRIES) {
            self.retry.max_retries = parse_var(ENV_MAX_RETRIES, &value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_DELAY_MS) {
            self.retry.delay_ms = parse_var(ENV_RETRY_DELAY_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_LABEL) {
            self.label = value;
        }

        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = GuardConfig::default()
            .merge_env_with(env(&[
                (ENV_TIMEOUT_MS, "2500"),
                (ENV_MAX_RETRIES, " 5 "),
                (ENV_LABEL, "Pet sync"),
            ]))
            .unwrap();

        assert_eq!(config.timeout.timeout_ms, 2_500);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.delay_ms, 1_000);
        assert_eq!(config.label, "Pet sync");
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let config = GuardConfig::default().merge_env_with(env(&[])).unwrap();
        assert_eq!(config, GuardConfig::default());
    }

    #[test]
    fn test_unparseable_env_is_rejected() {
        let err = GuardConfig::default()
            .merge_env_with(env(&[(ENV_RETRY_DELAY_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref name, .. } if name == ENV_RETRY_DELAY_MS));
    }

    #[test]
    fn test_env_zero_timeout_fails_validation() {
        let err = GuardConfig::default()
            .merge_env_with(env(&[(ENV_TIMEOUT_MS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_json_str_validates() {
        assert!(GuardConfig::from_json_str(r#"{"timeout": {"timeout_ms": 0}}"#).is_err());
        assert!(GuardConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"label": "Leaderboard", "timeout": {{"timeout_ms": 750}}}}"#
        )
        .unwrap();

        let config = GuardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.label, "Leaderboard");
        assert_eq!(config.timeout.timeout_ms, 750);
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GuardConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
