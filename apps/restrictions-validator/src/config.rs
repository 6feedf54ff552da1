//! Layered configuration for the validator.
//!
//! Sources, lowest priority first: built-in defaults, the YAML file given
//! with `--config`, then `RESTRICTIONS_*` environment variables with `__`
//! separating nested keys (`RESTRICTIONS_LOGGING__LEVEL=debug`).

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use resource_restrictions::ResourceRestrictionsConfig;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "RESTRICTIONS_";

/// Validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Settings handed to the restrictions engine.
    pub restrictions: ResourceRestrictionsConfig,
    pub logging: LoggingConfig,
}

/// Diagnostic logging, written to stderr.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a source holds an
    /// unknown or mistyped key.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid validator configuration")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_without_file() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg.logging.level, "warn");
        assert_eq!(
            cfg.restrictions.kubernetes.default_container_name,
            "authenticator"
        );
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "restrictions:\n  kubernetes:\n    accept_underscored_host_segments: false\nlogging:\n  json: true"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert!(!cfg.restrictions.kubernetes.accept_underscored_host_segments);
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "logging:\n  colour: true").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
