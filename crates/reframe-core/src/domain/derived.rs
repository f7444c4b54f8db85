//! The Derived Section: everything the composer computes for a root config.
//!
//! Downstream consumers (server bootstrap, bundler, CLI) read only from
//! here. Each field is `None` until its composition step has run, which is
//! what makes repeated composition a no-op.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{HookChain, HookName, OptionValue, RegisteredCommand, ResourceDescriptor};

/// Where a flattened plugin object came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PluginOrigin {
    /// The composer's default plugin, or one of its nested plugins.
    Default,
    /// The root config's own options.
    Root,
    /// A plugin declared under `plugins`, at the given nesting depth (1 = direct).
    Nested { depth: usize },
}

/// One entry of the flattened plugin sequence.
///
/// Holds the plugin's own options only; its nested plugins appear as
/// separate entries after it.
#[derive(Debug, Clone)]
pub struct PluginObject {
    pub name: String,
    pub origin: PluginOrigin,
    pub options: BTreeMap<String, OptionValue>,
}

/// Computed, flattened view of a root config.
#[derive(Debug, Clone, Default)]
pub struct DerivedSection {
    pub(crate) plugin_objects: Option<Vec<PluginObject>>,
    pub(crate) hook_chains: Option<BTreeMap<HookName, HookChain>>,
    pub(crate) resource_list: Option<Vec<ResourceDescriptor>>,
    pub(crate) cli_commands: Option<Vec<RegisteredCommand>>,
}

impl DerivedSection {
    /// `true` once every composition step has run.
    pub fn is_complete(&self) -> bool {
        self.plugin_objects.is_some()
            && self.hook_chains.is_some()
            && self.resource_list.is_some()
            && self.cli_commands.is_some()
    }

    pub fn plugin_objects(&self) -> &[PluginObject] {
        self.plugin_objects.as_deref().unwrap_or_default()
    }

    /// The merged chain for `name`; `None` when no plugin defines it.
    pub fn hook_chain(&self, name: HookName) -> Option<&HookChain> {
        self.hook_chains.as_ref()?.get(&name)
    }

    pub fn browser_config_chain(&self) -> Option<&HookChain> {
        self.hook_chain(HookName::WebpackBrowserConfig)
    }

    pub fn server_config_chain(&self) -> Option<&HookChain> {
        self.hook_chain(HookName::WebpackServerConfig)
    }

    pub fn resource_list(&self) -> &[ResourceDescriptor] {
        self.resource_list.as_deref().unwrap_or_default()
    }

    pub fn cli_commands(&self) -> &[RegisteredCommand] {
        self.cli_commands.as_deref().unwrap_or_default()
    }

    /// Find a plugin command by name.
    pub fn command(&self, name: &str) -> Option<&RegisteredCommand> {
        self.cli_commands().iter().find(|c| c.command.name() == name)
    }

    /// Serializable overview, used by `reframe config`.
    pub fn summary(&self) -> DerivedSummary {
        DerivedSummary {
            plugins: self
                .plugin_objects()
                .iter()
                .map(|p| PluginSummary {
                    name: p.name.clone(),
                    origin: p.origin,
                })
                .collect(),
            hooks: HookName::ALL
                .into_iter()
                .filter_map(|name| {
                    self.hook_chain(name).map(|chain| {
                        (
                            name.as_str().to_string(),
                            chain.contributors().into_iter().map(String::from).collect(),
                        )
                    })
                })
                .collect(),
            resources: self.resource_list().to_vec(),
            commands: self
                .cli_commands()
                .iter()
                .map(|c| CommandSummary {
                    name: c.command.name().into(),
                    params: c.command.params().map(String::from),
                    description: c.command.description().into(),
                    plugin: c.plugin.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSummary {
    pub plugins: Vec<PluginSummary>,
    /// Hook name → contributing plugins, innermost first.
    pub hooks: BTreeMap<String, Vec<String>>,
    pub resources: Vec<ResourceDescriptor>,
    pub commands: Vec<CommandSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub origin: PluginOrigin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    pub description: String,
    pub plugin: String,
}
