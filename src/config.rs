//! Settings loading.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file, `TRINO_DASH_*` environment variables. Command-line flags are
//! applied on top by the binary via [`Settings::override_with`].
//!
//! ```toml
//! endpoint = "http://trino-lb.internal:8998"
//! refresh_interval = "2s"
//! request_timeout = "10s"
//! log_file = "/tmp/trino-dash.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::api::DEFAULT_ENDPOINT;
use crate::data::duration::parse_duration;

/// Environment variable prefix, e.g. `TRINO_DASH_ENDPOINT`.
pub const ENV_PREFIX: &str = "TRINO_DASH";

/// Raw settings as read from file/environment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub refresh_interval: String,
    pub request_timeout: String,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            refresh_interval: "2s".to_string(),
            request_timeout: "10s".to_string(),
            log_file: None,
        }
    }
}

/// Values that may be supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub refresh_interval: Option<String>,
    pub request_timeout: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("endpoint", defaults.endpoint)?
            .set_default("refresh_interval", defaults.refresh_interval)?
            .set_default("request_timeout", defaults.request_timeout)?;

        if let Some(path) = path {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .context("loading configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line values on top.
    pub fn override_with(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(interval) = overrides.refresh_interval {
            self.refresh_interval = interval;
        }
        if let Some(timeout) = overrides.request_timeout {
            self.request_timeout = timeout;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("endpoint must not be empty");
        }
        self.refresh_period()?;
        self.timeout()?;
        Ok(())
    }

    /// Parsed polling period.
    pub fn refresh_period(&self) -> Result<Duration> {
        let period = parse_duration(&self.refresh_interval)
            .with_context(|| format!("refresh_interval: {}", self.refresh_interval))?;
        if period.is_zero() {
            anyhow::bail!("refresh_interval must be greater than zero");
        }
        Ok(period)
    }

    /// Parsed per-request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.request_timeout)
            .with_context(|| format!("request_timeout: {}", self.request_timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Environment source that never matches anything in the test process.
    fn no_env() -> Environment {
        Environment::with_prefix("TRINO_DASH_TEST_UNSET_PREFIX")
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load_with_env(None, no_env()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_period().unwrap(), Duration::from_secs(2));
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_file_is_tolerated() {
        let settings =
            Settings::load_with_env(Some(Path::new("/nonexistent/trino-dash.toml")), no_env())
                .unwrap();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_file_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://lb.internal:8998"
refresh_interval = "500ms"
log_file = "/tmp/dash.log"
"#
        )
        .unwrap();

        let settings = Settings::load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(settings.endpoint, "http://lb.internal:8998");
        assert_eq!(settings.refresh_period().unwrap(), Duration::from_millis(500));
        assert_eq!(settings.request_timeout, "10s");
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/dash.log")));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"refresh_interval = "often""#).unwrap();
        assert!(Settings::load_with_env(Some(file.path()), no_env()).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::default()
            .override_with(Overrides {
                endpoint: Some("http://other:1234".to_string()),
                refresh_interval: Some("5s".to_string()),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(settings.endpoint, "http://other:1234");
        assert_eq!(settings.refresh_period().unwrap(), Duration::from_secs(5));
        assert_eq!(settings.request_timeout, "10s");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = Settings::default().override_with(Overrides {
            refresh_interval: Some("0s".to_string()),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }
}
