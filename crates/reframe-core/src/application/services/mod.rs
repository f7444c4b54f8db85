//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "start an app" or "scaffold an app".

pub mod scaffold_service;
pub mod start_service;

pub use scaffold_service::{ScaffoldReport, ScaffoldService, validate_project_name};
pub use start_service::{LoadedApp, StartService};
