//! Application layer errors.
//!
//! These errors represent failures in orchestration (finding files, loading
//! them, writing a scaffold), not composition rules. Composition errors are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A required app directory could not be found.
    #[error("Can't find `{missing}/` directory (searched from {searched_from})")]
    AppFilesNotFound {
        missing: &'static str,
        searched_from: PathBuf,
    },

    /// The config file exists but could not be read or parsed.
    #[error("Failed to load config {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// In-memory adapter lock was poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Project name rejected before anything was written.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// No plugin provides the requested command.
    #[error("No plugin provides the command '{name}'")]
    UnknownCommand { name: String },

    /// The server bootstrap rejected the composed config.
    #[error("Server bootstrap failed: {reason}")]
    BootstrapFailed { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AppFilesNotFound { missing, .. } => vec![
                format!("Reframe looks for a `{missing}/` directory next to reframe.toml"),
                "Run the command from inside your app, or pass the app directory".into(),
                "Create a new app with: reframe init my-app".into(),
            ],
            Self::ConfigLoad { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
                "reframe.toml must be valid TOML".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different project name".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use letters, digits, hyphens, and underscores".into(),
                "Examples: my-app, blog_site, shop2".into(),
            ],
            Self::UnknownCommand { name } => vec![
                format!("'{name}' is not a built-in command nor provided by a plugin"),
                "List plugin commands with: reframe config".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AppFilesNotFound { .. } => ErrorCategory::NotFound,
            Self::UnknownCommand { .. } => ErrorCategory::NotFound,
            Self::ConfigLoad { .. } => ErrorCategory::Configuration,
            Self::BootstrapFailed { .. } => ErrorCategory::Configuration,
            Self::ProjectExists { .. } | Self::InvalidProjectName { .. } => {
                ErrorCategory::Validation
            }
            Self::FilesystemError { .. } | Self::LockPoisoned => {
                ErrorCategory::Internal
            }
        }
    }
}
