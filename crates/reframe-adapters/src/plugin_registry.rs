//! Installed plugins and named hook transforms.
//!
//! `reframe.toml` cannot hold functions, so it refers to plugins and
//! transforms by name. The registry is the [`NodeResolver`] that turns those
//! names back into config nodes and hook functions.

use std::collections::BTreeMap;

use tracing::trace;

use reframe_core::domain::{ConfigNode, HookFn, HookName, NodeResolver};

use crate::builtin_plugins::{self, DEFAULT_KIT};

#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, ConfigNode>,
    transforms: BTreeMap<(HookName, String), Transform>,
}

#[derive(Clone)]
struct Transform(HookFn);

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<transform>")
    }
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every plugin and transform shipped with Reframe.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_plugin(DEFAULT_KIT, builtin_plugins::default_kit());
        registry.register_plugin(builtin_plugins::AWS, builtin_plugins::aws());
        for (hook, name, f) in builtin_plugins::transforms() {
            registry.register_transform(hook, name, f);
        }
        registry
    }

    /// Register (or replace) a plugin under `name`.
    pub fn register_plugin(&mut self, name: impl Into<String>, plugin: ConfigNode) {
        self.plugins.insert(name.into(), plugin);
    }

    /// Register (or replace) a transform usable under `hook`.
    pub fn register_transform(&mut self, hook: HookName, name: impl Into<String>, f: HookFn) {
        self.transforms.insert((hook, name.into()), Transform(f));
    }

    /// The plugin the composer places first: `default-kit`, when registered.
    pub fn default_plugin(&self) -> Option<ConfigNode> {
        self.plugins.get(DEFAULT_KIT).cloned()
    }
}

impl NodeResolver for PluginRegistry {
    fn plugin(&self, name: &str) -> Option<ConfigNode> {
        trace!(plugin = name, "Resolving plugin");
        self.plugins.get(name).cloned()
    }

    fn transform(&self, hook: HookName, name: &str) -> Option<HookFn> {
        trace!(%hook, transform = name, "Resolving transform");
        self.transforms
            .get(&(hook, name.to_string()))
            .map(|t| t.0.clone())
    }
}
