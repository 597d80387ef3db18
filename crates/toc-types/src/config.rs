//! Configuration loading for essential-toc.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/essential-toc/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TocError;

/// Remote log sink settings.
///
/// The API key and source id are credentials; supply them through the config
/// file or `ESSENTIAL_TELEMETRY__API_KEY` / `ESSENTIAL_TELEMETRY__SOURCE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Telemetry is opt-in.
    #[serde(default)]
    pub enabled: bool,

    /// Log ingestion endpoint, without query string
    #[serde(default = "default_telemetry_endpoint")]
    pub endpoint: String,

    /// API key appended as `api_key=` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// Source id appended as `source=` query parameter
    #[serde(default)]
    pub source: Option<String>,

    /// Transport timeout for a single request (seconds)
    #[serde(default = "default_telemetry_timeout")]
    pub timeout_secs: u64,
}

fn default_telemetry_endpoint() -> String {
    "https://api.logflare.app/logs".to_string()
}

fn default_telemetry_timeout() -> u64 {
    10
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_telemetry_endpoint(),
            api_key: None,
            source: None,
            timeout_secs: default_telemetry_timeout(),
        }
    }
}

impl TelemetrySettings {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.api_key.as_deref().map_or(true, str::is_empty) {
            return Err("telemetry.api_key is required when telemetry is enabled".to_string());
        }
        if self.source.as_deref().map_or(true, str::is_empty) {
            return Err("telemetry.source is required when telemetry is enabled".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("telemetry.timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Quiet period used by UI debouncers (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Upper bound on parent links followed when expanding a TOC entry
    #[serde(default = "default_max_ascent_depth")]
    pub max_ascent_depth: usize,

    /// Remote logging
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_max_ascent_depth() -> usize {
    64
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            debounce_ms: default_debounce_ms(),
            max_ascent_depth: default_max_ascent_depth(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/essential-toc/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (ESSENTIAL_*, nested keys joined by `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, TocError> {
        let config_dir = ProjectDirs::from("", "", "essential-toc")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self::load_layers(Some(&config_dir.join("config")), cli_config_path, None)
    }

    /// Layered load with explicit sources.
    ///
    /// `user_config` is the optional per-user file (extension may be omitted).
    /// `env` replaces the process environment when given; keys keep their
    /// `ESSENTIAL_` prefix.
    pub fn load_layers(
        user_config: Option<&Path>,
        cli_config_path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, TocError> {
        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| TocError::Config(e.to_string()))?
            .set_default("debounce_ms", default_debounce_ms() as i64)
            .map_err(|e| TocError::Config(e.to_string()))?
            .set_default("max_ascent_depth", default_max_ascent_depth() as i64)
            .map_err(|e| TocError::Config(e.to_string()))?
            .set_default("telemetry.enabled", false)
            .map_err(|e| TocError::Config(e.to_string()))?
            .set_default("telemetry.endpoint", default_telemetry_endpoint())
            .map_err(|e| TocError::Config(e.to_string()))?
            .set_default("telemetry.timeout_secs", default_telemetry_timeout() as i64)
            .map_err(|e| TocError::Config(e.to_string()))?;

        if let Some(path) = user_config {
            builder = builder.add_source(File::with_name(&path.to_string_lossy()).required(false));
        }

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: ESSENTIAL_LOG_LEVEL, ESSENTIAL_TELEMETRY__API_KEY, etc.
        builder = builder.add_source(
            Environment::with_prefix("ESSENTIAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = builder
            .build()
            .map_err(|e| TocError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| TocError::Config(e.to_string()))?;

        settings.telemetry.validate().map_err(TocError::Config)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.max_ascent_depth, 64);
        assert!(!settings.telemetry.enabled);
        assert_eq!(settings.telemetry.endpoint, "https://api.logflare.app/logs");
    }

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn load_file(contents: &str, vars: &[(&str, &str)]) -> Result<Settings, TocError> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        Settings::load_layers(None, Some(file.path().to_str().unwrap()), env(vars))
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load_layers(None, None, env(&[])).unwrap();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.max_ascent_depth, 64);
        assert!(!settings.telemetry.enabled);
    }

    #[test]
    fn test_load_from_user_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "debounce_ms = 75\n").unwrap();

        let settings =
            Settings::load_layers(Some(&dir.path().join("config")), None, env(&[])).unwrap();
        assert_eq!(settings.debounce_ms, 75);
    }

    #[test]
    fn test_missing_user_config_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Settings::load_layers(Some(&dir.path().join("config")), None, env(&[])).unwrap();
        assert_eq!(settings.debounce_ms, 250);
    }

    #[test]
    fn test_env_supplies_telemetry_credentials() {
        let settings = load_file(
            "[telemetry]\nenabled = true\n",
            &[
                ("ESSENTIAL_TELEMETRY__API_KEY", "env-key"),
                ("ESSENTIAL_TELEMETRY__SOURCE", "env-source"),
            ],
        )
        .unwrap();

        assert!(settings.telemetry.enabled);
        assert_eq!(settings.telemetry.api_key.as_deref(), Some("env-key"));
        assert_eq!(settings.telemetry.source.as_deref(), Some("env-source"));
    }

    #[test]
    fn test_env_overrides_file() {
        let settings = load_file(
            "log_level = \"debug\"\ndebounce_ms = 100\n",
            &[("ESSENTIAL_LOG_LEVEL", "warn"), ("ESSENTIAL_DEBOUNCE_MS", "40")],
        )
        .unwrap();

        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.debounce_ms, 40);
    }

    #[test]
    fn test_load_from_cli_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"
debounce_ms = 100

[telemetry]
enabled = true
api_key = "key-123"
source = "source-abc"
"#
        )
        .unwrap();

        let settings =
            Settings::load_layers(None, Some(file.path().to_str().unwrap()), env(&[])).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.debounce_ms, 100);
        assert!(settings.telemetry.enabled);
        assert_eq!(settings.telemetry.api_key.as_deref(), Some("key-123"));
        assert_eq!(settings.telemetry.timeout_secs, 10);
    }

    #[test]
    fn test_load_rejects_enabled_telemetry_without_key() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[telemetry]\nenabled = true\nsource = \"s\"").unwrap();

        let result = Settings::load_layers(None, Some(file.path().to_str().unwrap()), env(&[]));
        assert!(matches!(result, Err(TocError::Config(msg)) if msg.contains("api_key")));
    }

    #[test]
    fn test_telemetry_validation() {
        let mut telemetry = TelemetrySettings::default();
        assert!(telemetry.validate().is_ok());

        telemetry.enabled = true;
        assert!(telemetry.validate().is_err());

        telemetry.api_key = Some("k".to_string());
        telemetry.source = Some("s".to_string());
        assert!(telemetry.validate().is_ok());

        telemetry.timeout_secs = 0;
        assert!(telemetry.validate().is_err());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let decoded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.debounce_ms, settings.debounce_ms);
        assert_eq!(decoded.telemetry.endpoint, settings.telemetry.endpoint);
    }
}
