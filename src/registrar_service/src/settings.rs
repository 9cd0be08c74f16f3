use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "config/registrar";

pub mod env {
    pub const ENV_PREFIX: &str = "REGISTRAR";
    pub const ENV_SEPARATOR: &str = "__";
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_registrations: u32,
    pub window_secs: u64,
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventSettings {
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegistrarSettings {
    pub rate_limit: RateLimitSettings,
    pub call_timeout_millis: u64,
    pub events: EventSettings,
}

impl RegistrarSettings {
    /// Load settings from `.env`, `config/registrar.{json,...}` and
    /// `REGISTRAR_*` environment variables, in increasing precedence.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(DEFAULT_CONFIG_FILE, None)
    }

    /// Load settings from `config_file`, overlaying `env_overrides` in place of
    /// the process environment when given.
    pub fn load_from(
        config_file: &str,
        env_overrides: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let environment = Environment::with_prefix(env::ENV_PREFIX)
            .prefix_separator("_")
            .separator(env::ENV_SEPARATOR)
            .try_parsing(true)
            .source(env_overrides);

        let settings: Self = Config::builder()
            .set_default("rate_limit.max_registrations", 100_i64)?
            .set_default("rate_limit.window_secs", 60_i64)?
            .set_default("call_timeout_millis", 5000_i64)?
            .set_default("events.channel_capacity", 1024_i64)?
            .add_source(File::with_name(config_file).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Message(
                "rate_limit.window_secs must be greater than zero".to_string(),
            ));
        }
        if self.call_timeout_millis == 0 {
            return Err(ConfigError::Message(
                "call_timeout_millis must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_FILE: &str = "config/does-not-exist";

    fn overrides(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults_apply_without_sources() {
        let settings = RegistrarSettings::load_from(MISSING_FILE, overrides(&[])).unwrap();

        assert_eq!(settings.rate_limit.max_registrations, 100);
        assert_eq!(settings.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(settings.call_timeout(), Duration::from_millis(5000));
        assert_eq!(settings.events.channel_capacity, 1024);
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let settings = RegistrarSettings::load_from(
            MISSING_FILE,
            overrides(&[
                ("REGISTRAR_RATE_LIMIT__MAX_REGISTRATIONS", "3"),
                ("REGISTRAR_CALL_TIMEOUT_MILLIS", "250"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.rate_limit.max_registrations, 3);
        assert_eq!(settings.call_timeout(), Duration::from_millis(250));
        assert_eq!(settings.rate_limit.window_secs, 60);
    }

    #[test]
    fn test_load_reads_bundled_config_file() {
        let loaded = RegistrarSettings::load().unwrap();
        let from_file = RegistrarSettings::load_from(DEFAULT_CONFIG_FILE, None).unwrap();

        assert_eq!(loaded, from_file);
        assert!(loaded.call_timeout_millis > 0);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let result = RegistrarSettings::load_from(
            MISSING_FILE,
            overrides(&[("REGISTRAR_RATE_LIMIT__WINDOW_SECS", "0")]),
        );

        assert!(matches!(result, Err(ConfigError::Message(_))));
    }
}
