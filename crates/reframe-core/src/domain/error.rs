// ============================================================================
// domain/error.rs - COMPOSITION ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// Every variant is fatal for startup: downstream consumers assume a fully
/// composed Derived Section, so nothing here is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Shape Errors
    // ========================================================================
    #[error("{location} must be a plain mapping, found {found}")]
    InvalidConfigShape { location: String, found: String },

    #[error("{location} references unknown plugin '{name}'")]
    UnknownPlugin { location: String, name: String },

    #[error("{location} sets reserved option '{key}' to {found}; {expected}")]
    ReservedOption {
        location: String,
        key: String,
        found: String,
        expected: String,
    },

    // ========================================================================
    // Plugin Contract Errors
    // ========================================================================
    #[error("plugin '{plugin}' declares '{hook}' but it is not a function (found {found})")]
    PluginContractViolation {
        plugin: String,
        hook: String,
        found: String,
    },

    #[error("plugin '{plugin}' declares a function under unknown hook '{key}'")]
    UnknownHook { plugin: String, key: String },

    #[error("plugin '{plugin}' has an invalid resource descriptor: {reason}")]
    InvalidResourceDescriptor {
        plugin: String,
        reason: String,
        disk_path: Option<PathBuf>,
    },

    // ========================================================================
    // Plugin Commands
    // ========================================================================
    #[error("command '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateCommand {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid command declared by plugin '{plugin}': {reason}")]
    InvalidCommand { plugin: String, reason: String },

    #[error("command '{name}' failed: {reason}")]
    CommandFailed { name: String, reason: String },

    /// The command was invoked correctly but its environment let it down.
    #[error("command '{name}' could not write {path}: {reason}")]
    CommandIo {
        name: String,
        path: PathBuf,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfigShape { location, .. } => vec![
                format!("Make {location} a table of options"),
                "Plugins are declared as `[[plugins]]` tables or plugin names".into(),
            ],
            Self::UnknownPlugin { name, .. } => vec![
                format!("No plugin named '{name}' is installed"),
                "Built-in plugins: default-kit, aws".into(),
                "Declare the plugin inline as a `[[plugins]]` table instead".into(),
            ],
            Self::ReservedOption { key, .. } => vec![
                format!("'{key}' has a fixed meaning in every config and plugin"),
                "Nested plugins go in the plugin list, `skipDefaults` is a boolean, `$name` a string"
                    .into(),
            ],
            Self::PluginContractViolation { hook, .. } => vec![
                format!("'{hook}' must name a registered transform"),
                "Available transforms: minify, source-maps".into(),
                "Remove the key if the plugin does not modify this build".into(),
            ],
            Self::UnknownHook { key, .. } => vec![
                format!("'{key}' is not a hook Reframe knows about"),
                "Known hooks: webpackBrowserConfig, webpackServerConfig".into(),
            ],
            Self::InvalidResourceDescriptor { .. } => vec![
                "`browserConfig.diskPath` must be an absolute path".into(),
                "Example: browserConfig = { diskPath = \"/srv/app/browser.js\" }".into(),
            ],
            Self::DuplicateCommand { name, .. } => vec![
                format!("Only one plugin may provide the '{name}' command"),
                "Remove one of the plugins from `plugins`".into(),
            ],
            Self::InvalidCommand { .. } => vec![
                "Each command needs a non-empty `name`".into(),
            ],
            Self::CommandFailed { name, .. } => vec![
                format!("Check the arguments passed to '{name}'"),
                "List plugin commands and their parameters with: reframe config".into(),
            ],
            Self::CommandIo { path, .. } => vec![
                format!("Check that {} is writable", path.display()),
                "Check that HOME points to a directory".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfigShape { .. }
            | Self::UnknownPlugin { .. }
            | Self::ReservedOption { .. }
            | Self::PluginContractViolation { .. }
            | Self::UnknownHook { .. }
            | Self::InvalidResourceDescriptor { .. }
            | Self::DuplicateCommand { .. }
            | Self::InvalidCommand { .. } => ErrorCategory::Composition,
            Self::CommandFailed { .. } => ErrorCategory::Validation,
            Self::CommandIo { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Composition,
    Validation,
    Internal,
}

impl ErrorCategory {
    /// Heading shown in front of the error message.
    pub fn title(self) -> &'static str {
        match self {
            Self::Composition => "Invalid configuration",
            Self::Validation => "Invalid input",
            Self::Internal => "Plugin command error",
        }
    }
}
