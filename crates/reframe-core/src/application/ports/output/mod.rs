//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `reframe-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ConfigNode, ResourceDescriptor};
use crate::error::ReframeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `reframe_adapters::filesystem::LocalFilesystem` (production)
/// - `reframe_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ReframeResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> ReframeResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> ReframeResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ReframeResult<()>;
}

// ── App discovery ────────────────────────────────────────────────────────────

/// Where an app's files live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppFiles {
    /// Directory holding `reframe.toml`, or the search start when there is none.
    pub app_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
}

/// Port for locating an app on disk.
///
/// Implemented by `reframe_adapters::LocalProjectLocator`.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectLocator: Send + Sync {
    /// Find the app that `start` belongs to, walking up parent directories.
    fn locate(&self, start: &Path) -> ReframeResult<AppFiles>;
}

/// Port for turning a config file into a root config.
///
/// Implemented by `reframe_adapters::TomlConfigSource`.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    fn load(&self, path: &Path) -> ReframeResult<ConfigNode>;
}

// ── Server bootstrap ─────────────────────────────────────────────────────────

/// Options of `reframe start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub production: bool,
    pub log: bool,
    pub host: String,
    pub port: u16,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            production: false,
            log: false,
            host: "localhost".into(),
            port: 3000,
        }
    }
}

/// A page found under `pages/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub name: String,
    pub path: PathBuf,
}

/// What the bootstrap hands back once the composed config was applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    pub address: String,
    pub production: bool,
    pub browser_config: Value,
    pub server_config: Value,
    pub pages: Vec<PageEntry>,
    pub resources: Vec<ResourceDescriptor>,
}

/// Port for the server/bundler bootstrap that consumes a composed config.
///
/// Implementations read only the Derived Section of `config`.
#[cfg_attr(test, mockall::automock)]
pub trait Bootstrap: Send + Sync {
    fn launch(
        &self,
        config: &ConfigNode,
        files: &AppFiles,
        options: &StartOptions,
    ) -> ReframeResult<BuildPlan>;
}

// ── Scaffolding ──────────────────────────────────────────────────────────────

/// A file of a new app, relative to the app root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: PathBuf,
    pub content: String,
}

impl ScaffoldFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Port for the files written by `reframe init`.
#[cfg_attr(test, mockall::automock)]
pub trait ScaffoldSource: Send + Sync {
    fn files(&self, project_name: &str) -> Vec<ScaffoldFile>;
}
