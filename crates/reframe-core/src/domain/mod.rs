//! Core domain layer for Reframe.
//!
//! Pure composition logic: config nodes, hooks, resources, plugin commands
//! and the [`Composer`] that flattens them into a [`DerivedSection`].
//!
//! - **No I/O**: files are read by adapters and handed over as values
//! - **No async**: composition runs once, synchronously, at startup
//! - **Owned trees**: plugins are values, so a config is always a tree
pub mod command;
pub mod composer;
pub mod config_node;
pub mod derived;
pub mod error;
pub mod hook;
pub mod resource;

pub use command::{CommandAction, CommandInvocation, CommandOutput, PluginCommand, RegisteredCommand};
pub use composer::Composer;
pub use config_node::{ConfigNode, ConfigNodeBuilder, NoResolver, NodeResolver, OptionValue};
pub use derived::{
    CommandSummary, DerivedSection, DerivedSummary, PluginObject, PluginOrigin, PluginSummary,
};
pub use error::{DomainError, ErrorCategory};
pub use hook::{BuildTarget, HookChain, HookContext, HookFn, HookName, hook_fn};
pub use resource::ResourceDescriptor;
