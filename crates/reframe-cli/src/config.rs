//! CLI settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns these settings; the core crate never sees them.  They are
//! unrelated to an app's `reframe.toml`.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `REFRAME_*` environment variables, e.g. `REFRAME_SERVER__PORT=8080`
//! 3. Config file (`--config FILE`, or the per-user default location)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};

/// CLI settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output settings.
    pub output: OutputConfig,
    /// Defaults for `reframe start`.
    pub server: ServerConfig,
    /// Defaults for `reframe init`.
    pub scaffold: ScaffoldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Never ask before creating an app.
    pub skip_confirm: bool,
}

impl AppConfig {
    /// Load settings: defaults, then the config file, then the environment.
    ///
    /// A file passed with `--config` must exist; the default file is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path().as_path()).required(false),
        };
        Self::load_from(file, Environment::with_prefix("REFRAME"))
    }

    fn load_from(
        file: File<FileSourceFile, FileFormat>,
        env: Environment,
    ) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialise default settings")?;

        Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.reframe.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "reframe", "reframe")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".reframe.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env() -> Environment {
        Environment::with_prefix("REFRAME_TEST_UNSET")
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, "auto");
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 3000);
        assert!(!cfg.scaffold.skip_confirm);
    }

    #[test]
    fn file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let cfg =
            AppConfig::load_from(File::from(path.as_path()).required(true), no_env()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "localhost");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        let cfg =
            AppConfig::load_from(File::from(path.as_path()).required(false), no_env()).unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let env = Environment::with_prefix("REFRAME").source(Some(
            [("REFRAME_SERVER__PORT".to_string(), "9000".to_string())]
                .into_iter()
                .collect(),
        ));
        let cfg = AppConfig::load_from(File::from(path.as_path()).required(true), env).unwrap();
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
