//! Reframe Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of Reframe: the
//! config composer that flattens a tree of plugins into one Derived Section,
//! and the use cases built on top of it.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           reframe-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (StartService, ScaffoldService)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Locator, ConfigSource, Bootstrap, Fs)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     reframe-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ConfigNode, Composer, HookChain, ...) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use reframe_core::domain::{Composer, ConfigNode, HookContext, HookName};
//! use serde_json::json;
//!
//! let mut root = ConfigNode::builder()
//!     .hook(HookName::WebpackBrowserConfig, |_: &HookContext, mut config| {
//!         config["mode"] = json!("development");
//!         config
//!     })
//!     .build();
//!
//! Composer::new().compose(&mut root).unwrap();
//! let derived = root.derived().unwrap();
//! assert_eq!(derived.plugin_objects().len(), 1);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        LoadedApp, ScaffoldReport, ScaffoldService, StartService,
        ports::{
            AppFiles, Bootstrap, BuildPlan, ConfigSource, Filesystem, PageEntry, ProjectLocator,
            ScaffoldFile, ScaffoldSource, StartOptions,
        },
    };
    pub use crate::domain::{
        BuildTarget, Composer, ConfigNode, DerivedSection, HookContext, HookFn, HookName,
        NodeResolver, OptionValue, PluginCommand, ResourceDescriptor,
    };
    pub use crate::error::{ReframeError, ReframeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
