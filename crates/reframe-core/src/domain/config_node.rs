//! The recursive config/plugin node.
//!
//! The root config and every plugin share one shape: a mapping of options
//! plus an ordered list of nested plugins. Anything legal at the root is
//! legal in a plugin, including further `plugins`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::{
    DomainError, DerivedSection, HookFn, HookName, PluginCommand, ResourceDescriptor,
    resource::value_kind,
};

// ── Reserved option keys ─────────────────────────────────────────────────────

pub const PLUGINS_KEY: &str = "plugins";
pub const SKIP_DEFAULTS_KEY: &str = "skipDefaults";
pub const NAME_KEY: &str = "$name";
pub const BROWSER_CONFIG_KEY: &str = "browserConfig";
pub const CLI_COMMANDS_KEY: &str = "cliCommands";

// ── OptionValue ──────────────────────────────────────────────────────────────

/// The value stored under one option key.
#[derive(Clone)]
pub enum OptionValue {
    /// A callable hook implementation.
    Hook(HookFn),
    /// Commands contributed to the CLI.
    Commands(Vec<PluginCommand>),
    /// A browser config declared in code.
    Resource(ResourceDescriptor),
    /// Anything else: plain data as loaded from a file or set in code.
    Data(Value),
}

impl OptionValue {
    /// Short description of what this value is, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hook(_) => "function",
            Self::Commands(_) => "command list",
            Self::Resource(_) => "resource descriptor",
            Self::Data(v) => value_kind(v),
        }
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Self::Data(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Hook(_))
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook(_) => f.write_str("Hook(<fn>)"),
            Self::Commands(cmds) => f.debug_tuple("Commands").field(cmds).finish(),
            Self::Resource(d) => f.debug_tuple("Resource").field(d).finish(),
            Self::Data(v) => f.debug_tuple("Data").field(v).finish(),
        }
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

// ── NodeResolver ─────────────────────────────────────────────────────────────

/// Resolves names found in loose config values into code.
///
/// Config files cannot hold functions, so they reference plugins and hook
/// transforms by name; a resolver turns those names into values.
pub trait NodeResolver {
    /// Look up an installed plugin by name.
    fn plugin(&self, name: &str) -> Option<ConfigNode>;

    /// Look up a named transform usable under `hook`.
    fn transform(&self, hook: HookName, name: &str) -> Option<HookFn>;
}

/// Resolver that knows no names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl NodeResolver for NoResolver {
    fn plugin(&self, _name: &str) -> Option<ConfigNode> {
        None
    }

    fn transform(&self, _hook: HookName, _name: &str) -> Option<HookFn> {
        None
    }
}

// ── ConfigNode ───────────────────────────────────────────────────────────────

/// A Config Object (root) or Plugin Object (nested); the shape is identical.
#[derive(Debug, Clone, Default)]
pub struct ConfigNode {
    options: BTreeMap<String, OptionValue>,
    plugins: Vec<ConfigNode>,
    derived: Option<DerivedSection>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ConfigNodeBuilder {
        ConfigNodeBuilder::default()
    }

    /// Build a node from a loose value with no name resolution.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        Self::from_value_with(value, &NoResolver)
    }

    /// Build a node from a loose value (e.g. a parsed config file).
    ///
    /// The value and every entry of its `plugins` array must be tables or
    /// plugin names; strings under hook keys are resolved as transforms and
    /// kept as plain data when the resolver does not know them.
    pub fn from_value_with(value: Value, resolver: &dyn NodeResolver) -> Result<Self, DomainError> {
        Self::convert("root config".to_string(), value, resolver)
    }

    fn convert(
        location: String,
        value: Value,
        resolver: &dyn NodeResolver,
    ) -> Result<Self, DomainError> {
        let table = match value {
            Value::Object(table) => table,
            other => {
                return Err(DomainError::InvalidConfigShape {
                    location,
                    found: value_kind(&other).into(),
                });
            }
        };

        let mut node = ConfigNode::new();
        for (key, value) in table {
            if key == PLUGINS_KEY {
                node.plugins = Self::convert_plugins(&location, value, resolver)?;
                continue;
            }

            let transform = match (HookName::from_key(&key), value.as_str()) {
                (Some(hook), Some(name)) => resolver.transform(hook, name),
                _ => None,
            };
            let option = match transform {
                Some(f) => OptionValue::Hook(f),
                None => OptionValue::Data(value),
            };
            node.options.insert(key, option);
        }
        Ok(node)
    }

    fn convert_plugins(
        parent: &str,
        value: Value,
        resolver: &dyn NodeResolver,
    ) -> Result<Vec<ConfigNode>, DomainError> {
        let entries = match value {
            Value::Array(entries) => entries,
            other => {
                return Err(DomainError::InvalidConfigShape {
                    location: format!("`plugins` of {parent}"),
                    found: value_kind(&other).into(),
                });
            }
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let location = format!("plugins[{i}] of {parent}");
                match entry {
                    Value::String(name) => resolver
                        .plugin(&name)
                        .ok_or(DomainError::UnknownPlugin { location, name }),
                    other => Self::convert(location, other, resolver),
                }
            })
            .collect()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// The `$name` option, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.options
            .get(NAME_KEY)
            .and_then(OptionValue::as_data)
            .and_then(Value::as_str)
    }

    /// `true` when the node opts out of the default plugin.
    pub fn skip_defaults(&self) -> bool {
        matches!(
            self.options.get(SKIP_DEFAULTS_KEY),
            Some(OptionValue::Data(Value::Bool(true)))
        )
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn plugins(&self) -> &[ConfigNode] {
        &self.plugins
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn push_plugin(&mut self, plugin: ConfigNode) {
        self.plugins.push(plugin);
    }

    /// `true` when the node declares anything a plugin can contribute:
    /// a hook, a browser config, or CLI commands.
    pub fn contributes(&self) -> bool {
        self.options.iter().any(|(key, value)| {
            value.is_callable()
                || HookName::from_key(key).is_some()
                || key == BROWSER_CONFIG_KEY
                || key == CLI_COMMANDS_KEY
        })
    }

    /// The Derived Section, once [`super::Composer::compose`] has run.
    pub fn derived(&self) -> Option<&DerivedSection> {
        self.derived.as_ref()
    }

    pub(crate) fn set_derived(&mut self, derived: DerivedSection) {
        self.derived = Some(derived);
    }
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Builds config nodes in code (plugins shipped as Rust values).
#[derive(Debug, Default)]
pub struct ConfigNodeBuilder {
    node: ConfigNode,
}

impl ConfigNodeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.set_option(NAME_KEY, Value::String(name.into()));
        self
    }

    pub fn skip_defaults(mut self, skip: bool) -> Self {
        self.node.set_option(SKIP_DEFAULTS_KEY, Value::Bool(skip));
        self
    }

    pub fn hook<F>(mut self, name: HookName, f: F) -> Self
    where
        F: Fn(&super::HookContext, Value) -> Value + Send + Sync + 'static,
    {
        self.node
            .set_option(name.as_str(), OptionValue::Hook(super::hook_fn(f)));
        self
    }

    pub fn hook_fn(mut self, name: HookName, f: HookFn) -> Self {
        self.node.set_option(name.as_str(), OptionValue::Hook(f));
        self
    }

    pub fn browser_config(mut self, descriptor: ResourceDescriptor) -> Self {
        self.node
            .set_option(BROWSER_CONFIG_KEY, OptionValue::Resource(descriptor));
        self
    }

    pub fn command(mut self, command: PluginCommand) -> Self {
        match self.node.options.get_mut(CLI_COMMANDS_KEY) {
            Some(OptionValue::Commands(cmds)) => cmds.push(command),
            _ => self
                .node
                .set_option(CLI_COMMANDS_KEY, OptionValue::Commands(vec![command])),
        }
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.node.set_option(key, value);
        self
    }

    pub fn plugin(mut self, plugin: ConfigNode) -> Self {
        self.node.push_plugin(plugin);
        self
    }

    pub fn build(self) -> ConfigNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HookContext, hook_fn};
    use serde_json::json;

    struct OneOfEach;

    impl NodeResolver for OneOfEach {
        fn plugin(&self, name: &str) -> Option<ConfigNode> {
            (name == "kit").then(|| ConfigNode::builder().name("kit").build())
        }

        fn transform(&self, _hook: HookName, name: &str) -> Option<HookFn> {
            (name == "minify").then(|| hook_fn(|_, v| v))
        }
    }

    #[test]
    fn non_table_root_is_invalid_shape() {
        let err = ConfigNode::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidConfigShape {
                location: "root config".into(),
                found: "array".into(),
            }
        );
    }

    #[test]
    fn non_table_plugin_is_invalid_shape() {
        let err = ConfigNode::from_value(json!({ "plugins": [{}, 42] })).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidConfigShape { ref location, .. } if location.starts_with("plugins[1]")
        ));
    }

    #[test]
    fn plugins_must_be_an_array() {
        assert!(matches!(
            ConfigNode::from_value(json!({ "plugins": { "a": 1 } })),
            Err(DomainError::InvalidConfigShape { .. })
        ));
    }

    #[test]
    fn nested_plugins_are_converted_recursively() {
        let node = ConfigNode::from_value(json!({
            "plugins": [{ "$name": "a", "plugins": [{ "$name": "b" }] }],
            "port": 3000
        }))
        .unwrap();

        assert_eq!(node.plugins().len(), 1);
        assert_eq!(node.plugins()[0].name(), Some("a"));
        assert_eq!(node.plugins()[0].plugins()[0].name(), Some("b"));
        assert_eq!(node.option("port").and_then(OptionValue::as_data), Some(&json!(3000)));
    }

    #[test]
    fn resolver_supplies_named_plugins_and_transforms() {
        let node = ConfigNode::from_value_with(
            json!({
                "plugins": ["kit"],
                "webpackBrowserConfig": "minify",
                "webpackServerConfig": "unknown-transform"
            }),
            &OneOfEach,
        )
        .unwrap();

        assert_eq!(node.plugins()[0].name(), Some("kit"));
        assert!(node.option("webpackBrowserConfig").unwrap().is_callable());
        assert!(!node.option("webpackServerConfig").unwrap().is_callable());
    }

    #[test]
    fn unknown_plugin_name_is_reported() {
        let err = ConfigNode::from_value(json!({ "plugins": ["missing"] })).unwrap_err();
        assert!(matches!(err, DomainError::UnknownPlugin { ref name, .. } if name == "missing"));
    }

    #[test]
    fn skip_defaults_requires_true() {
        assert!(ConfigNode::from_value(json!({ "skipDefaults": true })).unwrap().skip_defaults());
        assert!(!ConfigNode::from_value(json!({ "skipDefaults": "yes" })).unwrap().skip_defaults());
        assert!(!ConfigNode::new().skip_defaults());
    }

    #[test]
    fn contributes_detects_hooks_resources_and_commands() {
        assert!(!ConfigNode::builder().name("bare").option("port", json!(1)).build().contributes());
        assert!(
            ConfigNode::builder()
                .hook(HookName::WebpackServerConfig, |_: &HookContext, v| v)
                .build()
                .contributes()
        );
        assert!(
            ConfigNode::builder()
                .command(PluginCommand::new("x", "", |_| Ok(Vec::new())))
                .build()
                .contributes()
        );
    }
}
