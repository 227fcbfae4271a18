use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use routecast_core::model::{DayCount, Metric, TimeOfDay};
use routecast_provider_accuweather::{AccuWeatherSettings, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use serde::Deserialize;

/// Overrides the config file location.
const CONFIG_PATH_VAR: &str = "ROUTECAST_CONFIG";
/// Overrides `provider.api_key`.
const API_KEY_VAR: &str = "ROUTECAST_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub provider: ProviderConfig,
    pub defaults: DefaultsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    /// Per-request timeout applied by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            timeout_secs: 10,
        }
    }
}

impl ProviderConfig {
    pub(crate) fn settings(&self) -> AccuWeatherSettings {
        AccuWeatherSettings {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            language: self.language.clone(),
        }
    }
}

/// Initial dashboard state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct DefaultsConfig {
    pub days: DayCount,
    /// `День` or `Ночь`.
    pub time_of_day: String,
    pub metric: Metric,
    pub start: Option<String>,
    pub end: Option<String>,
    pub intermediates: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            days: DayCount::default(),
            time_of_day: TimeOfDay::default().label().to_owned(),
            metric: Metric::default(),
            start: None,
            end: None,
            intermediates: Vec::new(),
        }
    }
}

impl DefaultsConfig {
    pub(crate) fn time_of_day(&self) -> Result<TimeOfDay> {
        self.time_of_day
            .parse()
            .context("Invalid defaults.time_of_day")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            file: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent), apply env overrides and validate.
    pub(crate) fn load() -> Result<Self> {
        let path = Self::config_path();

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(api_key) = env::var(API_KEY_VAR) {
            config.provider.api_key = api_key;
        }

        config.defaults.time_of_day()?;

        Ok(config)
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration")
    }

    pub(crate) fn config_path() -> PathBuf {
        env::var_os(CONFIG_PATH_VAR).map_or_else(
            || {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("routecast")
                    .join("config.toml")
            },
            PathBuf::from,
        )
    }

    /// Non-fatal problems worth showing to the user.
    pub(crate) fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.provider.api_key.trim().is_empty() {
            warnings.push(format!(
                "No API key configured: set provider.api_key or {API_KEY_VAR}"
            ));
        }
        if self.provider.timeout_secs == 0 {
            warnings.push(String::from("provider.timeout_secs is 0, requests never time out"));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").expect("empty config parses");

        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.language, "ru-ru");
        assert_eq!(config.defaults.days.get(), 3);
        assert_eq!(config.defaults.time_of_day().ok(), Some(TimeOfDay::Day));
        assert_eq!(config.defaults.metric, Metric::Temperature);
        assert_eq!(config.warnings().len(), 1);
    }

    #[test]
    fn full_file_is_read() {
        let config = Config::from_toml(
            r#"
            [provider]
            api_key = "secret"
            base_url = "http://localhost:8080"
            timeout_secs = 3

            [defaults]
            days = 5
            time_of_day = "Ночь"
            metric = "wind_speed"
            start = "Москва"
            end = "Санкт-Петербург"
            intermediates = ["Тверь"]

            [logging]
            level = "debug"
            file = "/tmp/routecast.log"
            "#,
        )
        .expect("config parses");

        assert_eq!(config.provider.settings().api_key, "secret");
        assert_eq!(config.provider.timeout_secs, 3);
        assert_eq!(config.defaults.days.get(), 5);
        assert_eq!(config.defaults.time_of_day().ok(), Some(TimeOfDay::Night));
        assert_eq!(config.defaults.metric, Metric::WindSpeed);
        assert_eq!(config.defaults.intermediates, vec![String::from("Тверь")]);
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/routecast.log")));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn out_of_range_days_are_rejected() {
        assert!(Config::from_toml("[defaults]\ndays = 7\n").is_err());
        assert!(Config::from_toml("[defaults]\ndays = 0\n").is_err());
    }

    #[test]
    fn unknown_time_of_day_is_rejected() {
        let config = Config::from_toml("[defaults]\ntime_of_day = \"Вечер\"\n")
            .expect("strings parse");

        assert!(config.defaults.time_of_day().is_err());
    }
}
