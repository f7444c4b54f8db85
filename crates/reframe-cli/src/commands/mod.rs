//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into calls on the core services and print
//! the results. No composition logic lives here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reframe_adapters::{
    BuildPlanner, LocalFilesystem, LocalProjectLocator, PluginRegistry, TomlConfigSource,
};
use reframe_core::{application::StartService, domain::Composer};

use crate::error::{CliResult, IntoCli};

pub mod completions;
pub mod config;
pub mod init;
pub mod plugin;
pub mod start;

/// Wire the local adapters and the built-in plugins into a [`StartService`].
pub(crate) fn start_service() -> StartService {
    let registry = Arc::new(PluginRegistry::with_builtins());
    let composer = match registry.default_plugin() {
        Some(kit) => Composer::with_default_plugin(kit),
        None => Composer::new(),
    };

    StartService::new(
        Box::new(LocalProjectLocator::new()),
        Box::new(TomlConfigSource::new(
            Box::new(LocalFilesystem::new()),
            registry,
        )),
        Box::new(BuildPlanner::new()),
        composer,
    )
}

/// `dir` if given, else the current directory.
pub(crate) fn working_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().with_cli_context(|| "Failed to read current directory"),
    }
}
