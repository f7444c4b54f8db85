//! Commands contributed to the CLI by plugins.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::DomainError;

/// Everything a plugin command receives when it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Positional arguments following the command name.
    pub args: Vec<String>,
    /// Directory containing `reframe.toml`, when one was found.
    pub app_dir: Option<PathBuf>,
}

/// What a command reports back on success: lines to print.
pub type CommandOutput = Vec<String>;

pub type CommandAction =
    Arc<dyn Fn(&CommandInvocation) -> Result<CommandOutput, DomainError> + Send + Sync>;

/// A command declared under a plugin's `cliCommands` option.
#[derive(Clone)]
pub struct PluginCommand {
    name: String,
    params: Option<String>,
    description: String,
    action: CommandAction,
}

impl PluginCommand {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, action: F) -> Self
    where
        F: Fn(&CommandInvocation) -> Result<CommandOutput, DomainError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: None,
            description: description.into(),
            action: Arc::new(action),
        }
    }

    /// Usage string for positional parameters, e.g. `[region]`.
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, DomainError> {
        (self.action)(invocation)
    }
}

impl fmt::Debug for PluginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginCommand")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A command together with the plugin that declared it.
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub plugin: String,
    pub command: PluginCommand,
}
