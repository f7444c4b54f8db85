//! Application layer for Reframe.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (StartService, ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! composition logic itself. Those rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{LoadedApp, ScaffoldReport, ScaffoldService, StartService};

// Re-export port traits (for adapter implementation)
pub use ports::{
    AppFiles, Bootstrap, BuildPlan, ConfigSource, Filesystem, PageEntry, ProjectLocator,
    ScaffoldFile, ScaffoldSource, StartOptions,
};

pub use error::ApplicationError;
