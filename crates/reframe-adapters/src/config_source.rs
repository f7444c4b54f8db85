//! `reframe.toml` loader.
//!
//! # Format
//!
//! ```toml
//! "$name" = "my-app"
//! skipDefaults = false
//!
//! # Named transforms run on the build configuration
//! webpackBrowserConfig = "minify"
//!
//! # Installed plugins by name, or inline tables (nested configs)
//! plugins = [
//!     "aws",
//!     { "$name" = "assets", browserConfig = { diskPath = "/srv/assets" } },
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use reframe_core::{
    application::{
        ApplicationError,
        ports::{ConfigSource, Filesystem},
    },
    domain::ConfigNode,
    error::ReframeResult,
};

use crate::plugin_registry::PluginRegistry;

pub const CONFIG_FILE_NAME: &str = "reframe.toml";

/// Reads `reframe.toml` through the `Filesystem` port and resolves names
/// against a [`PluginRegistry`].
pub struct TomlConfigSource {
    filesystem: Box<dyn Filesystem>,
    registry: Arc<PluginRegistry>,
}

impl TomlConfigSource {
    pub fn new(filesystem: Box<dyn Filesystem>, registry: Arc<PluginRegistry>) -> Self {
        Self {
            filesystem,
            registry,
        }
    }

    /// Parse TOML text into a root config.
    pub fn parse(&self, path: &Path, raw: &str) -> ReframeResult<ConfigNode> {
        let value: Value = toml::from_str(raw).map_err(|e| ApplicationError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        Ok(ConfigNode::from_value_with(value, self.registry.as_ref())?)
    }
}

impl ConfigSource for TomlConfigSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn load(&self, path: &Path) -> ReframeResult<ConfigNode> {
        let raw = self.filesystem.read_to_string(path).map_err(|e| {
            ApplicationError::ConfigLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let node = self.parse(path, &raw)?;
        debug!(
            options = node.options().len(),
            plugins = node.plugins().len(),
            "Config loaded"
        );
        Ok(node)
    }
}
