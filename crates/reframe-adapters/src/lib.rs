//! Infrastructure adapters for Reframe.
//!
//! This crate implements the ports defined in `reframe-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod build_plan;
pub mod builtin_plugins;
pub mod config_source;
pub mod filesystem;
pub mod plugin_registry;
pub mod project_locator;
pub mod scaffold_templates;

// Re-export commonly used adapters
pub use build_plan::BuildPlanner;
pub use config_source::TomlConfigSource;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use plugin_registry::PluginRegistry;
pub use project_locator::LocalProjectLocator;
pub use scaffold_templates::AppTemplate;
