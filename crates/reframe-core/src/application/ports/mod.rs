//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `reframe-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `ProjectLocator`: Finding `reframe.toml` and `pages/`
//!   - `ConfigSource`: Loading a root config
//!   - `Bootstrap`: Consuming the composed config
//!   - `ScaffoldSource`: Files of a new app
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    AppFiles, Bootstrap, BuildPlan, ConfigSource, Filesystem, PageEntry, ProjectLocator,
    ScaffoldFile, ScaffoldSource, StartOptions,
};
