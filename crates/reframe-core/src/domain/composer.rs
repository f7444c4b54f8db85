//! The config composer.
//!
//! Turns a recursively nested config/plugin tree into the flat Derived
//! Section that the rest of Reframe reads:
//!
//! ```text
//! root ─┬─ plugins[0] ── plugins[0]        pluginObjects:
//!       └─ plugins[1]                        [default?, root, p0, p0.p0, p1]
//!
//! webpackBrowserConfig chain:  p1( p0( root( default(x) ) ) )
//! ```
//!
//! Steps run in order (plugin discovery, hook merge, resource collection,
//! command collection). Each step skips itself when its Derived Section key
//! is already present, so composing twice is a no-op.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, instrument, trace};

use super::{
    ConfigNode, DomainError, HookChain, HookName, OptionValue, PluginObject,
    PluginOrigin, RegisteredCommand, ResourceDescriptor,
    config_node::{
        BROWSER_CONFIG_KEY, CLI_COMMANDS_KEY, NAME_KEY, PLUGINS_KEY, SKIP_DEFAULTS_KEY,
    },
};

/// Flattens config trees. Holds the optional default plugin.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    default_plugin: Option<ConfigNode>,
}

impl Composer {
    /// A composer with no default plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer that places `plugin` first in every flattened sequence,
    /// unless the root sets `skipDefaults`.
    pub fn with_default_plugin(plugin: ConfigNode) -> Self {
        Self {
            default_plugin: Some(plugin),
        }
    }

    /// Compute the Derived Section of `root` in place.
    ///
    /// On error the root is left exactly as it was: steps work on a staged
    /// copy that is only written back once all of them succeed.
    #[instrument(skip_all, fields(root = root.name().unwrap_or("root")))]
    pub fn compose(&self, root: &mut ConfigNode) -> Result<(), DomainError> {
        let mut staged = root.derived().cloned().unwrap_or_default();
        if staged.is_complete() {
            debug!("Config already composed");
            return Ok(());
        }

        if staged.plugin_objects.is_none() {
            staged.plugin_objects = Some(self.flatten(root)?);
        }
        let plugins = staged.plugin_objects.as_deref().unwrap_or_default();

        if staged.hook_chains.is_none() {
            staged.hook_chains = Some(merge_hooks(plugins)?);
        }
        if staged.resource_list.is_none() {
            staged.resource_list = Some(collect_resources(plugins)?);
        }
        if staged.cli_commands.is_none() {
            staged.cli_commands = Some(collect_commands(plugins)?);
        }

        debug!(
            plugins = staged.plugin_objects().len(),
            hooks = staged.hook_chains.as_ref().map_or(0, BTreeMap::len),
            resources = staged.resource_list().len(),
            commands = staged.cli_commands().len(),
            "Config composed"
        );
        root.set_derived(staged);
        Ok(())
    }

    // ── Plugin discovery ─────────────────────────────────────────────────

    fn flatten(&self, root: &ConfigNode) -> Result<Vec<PluginObject>, DomainError> {
        let mut out = Vec::new();
        check_reserved(root, "root config")?;

        match &self.default_plugin {
            Some(default) if !root.skip_defaults() => {
                visit(default, "default".into(), PluginOrigin::Default, &mut out)?;
            }
            Some(_) => debug!("Root opted out of the default plugin"),
            None => {}
        }

        // The root's own options behave like one more plugin, but only
        // when it actually contributes something.
        if root.contributes() {
            out.push(PluginObject {
                name: root.name().unwrap_or("root").to_string(),
                origin: PluginOrigin::Root,
                options: root.options().clone(),
            });
        }

        for (i, plugin) in root.plugins().iter().enumerate() {
            visit(
                plugin,
                format!("plugins[{i}]"),
                PluginOrigin::Nested { depth: 1 },
                &mut out,
            )?;
        }
        Ok(out)
    }
}

/// Depth-first pre-order walk: a plugin precedes the plugins it declares.
fn visit(
    node: &ConfigNode,
    path: String,
    origin: PluginOrigin,
    out: &mut Vec<PluginObject>,
) -> Result<(), DomainError> {
    check_reserved(node, &path)?;
    let name = node.name().map_or_else(|| path.clone(), String::from);
    trace!(plugin = %name, ?origin, "Visiting plugin");

    out.push(PluginObject {
        name,
        origin,
        options: node.options().clone(),
    });

    let child_origin = match origin {
        PluginOrigin::Nested { depth } => PluginOrigin::Nested { depth: depth + 1 },
        other => other,
    };
    for (i, child) in node.plugins().iter().enumerate() {
        visit(child, format!("{path}.plugins[{i}]"), child_origin, out)?;
    }
    Ok(())
}

/// Reserved keys set through [`ConfigNode::set_option`] bypass the checks
/// `ConfigNode::from_value` applies; catch them before they are ignored.
fn check_reserved(node: &ConfigNode, location: &str) -> Result<(), DomainError> {
    for (key, value) in node.options() {
        let expected = match (key.as_str(), value) {
            (PLUGINS_KEY, _) => "nested plugins belong in the plugin list",
            (SKIP_DEFAULTS_KEY, OptionValue::Data(Value::Bool(_))) => continue,
            (SKIP_DEFAULTS_KEY, _) => "expected a boolean",
            (NAME_KEY, OptionValue::Data(Value::String(_))) => continue,
            (NAME_KEY, _) => "expected a string",
            _ => continue,
        };
        return Err(DomainError::ReservedOption {
            location: location.to_string(),
            key: key.clone(),
            found: value.kind().into(),
            expected: expected.into(),
        });
    }
    Ok(())
}

// ── Hook merge ───────────────────────────────────────────────────────────────

fn merge_hooks(plugins: &[PluginObject]) -> Result<BTreeMap<HookName, HookChain>, DomainError> {
    let mut chains: BTreeMap<HookName, HookChain> = BTreeMap::new();

    for plugin in plugins {
        for (key, value) in &plugin.options {
            match (HookName::from_key(key), value) {
                (Some(name), OptionValue::Hook(hook)) => match chains.get_mut(&name) {
                    Some(chain) => chain.wrap(&plugin.name, hook.clone()),
                    None => {
                        chains.insert(name, HookChain::new(name, &plugin.name, hook.clone()));
                    }
                },
                (Some(name), other) => {
                    return Err(DomainError::PluginContractViolation {
                        plugin: plugin.name.clone(),
                        hook: name.to_string(),
                        found: other.kind().into(),
                    });
                }
                (None, OptionValue::Hook(_)) => {
                    return Err(DomainError::UnknownHook {
                        plugin: plugin.name.clone(),
                        key: key.clone(),
                    });
                }
                (None, _) => {}
            }
        }
    }
    Ok(chains)
}

// ── Resource collection ──────────────────────────────────────────────────────

fn collect_resources(plugins: &[PluginObject]) -> Result<Vec<ResourceDescriptor>, DomainError> {
    plugins
        .iter()
        .filter_map(|plugin| {
            plugin
                .options
                .get(BROWSER_CONFIG_KEY)
                .map(|value| (plugin, value))
        })
        .map(|(plugin, value)| match value {
            OptionValue::Data(data) => ResourceDescriptor::from_value(&plugin.name, data),
            OptionValue::Resource(descriptor) => descriptor.clone().validated(&plugin.name),
            other => Err(DomainError::InvalidResourceDescriptor {
                plugin: plugin.name.clone(),
                reason: format!("expected a table, found {}", other.kind()),
                disk_path: None,
            }),
        })
        .collect()
}

// ── Command collection ───────────────────────────────────────────────────────

fn collect_commands(plugins: &[PluginObject]) -> Result<Vec<RegisteredCommand>, DomainError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut out = Vec::new();

    for plugin in plugins {
        let commands = match plugin.options.get(CLI_COMMANDS_KEY) {
            None => continue,
            Some(OptionValue::Commands(commands)) => commands,
            Some(other) => {
                return Err(DomainError::InvalidCommand {
                    plugin: plugin.name.clone(),
                    reason: format!(
                        "`cliCommands` must be registered in code, found {}",
                        other.kind()
                    ),
                });
            }
        };

        for command in commands {
            let name = command.name().trim();
            if name.is_empty() {
                return Err(DomainError::InvalidCommand {
                    plugin: plugin.name.clone(),
                    reason: "command name is empty".into(),
                });
            }
            if let Some(first) = seen.insert(name.to_string(), plugin.name.clone()) {
                return Err(DomainError::DuplicateCommand {
                    name: name.to_string(),
                    first,
                    second: plugin.name.clone(),
                });
            }
            out.push(RegisteredCommand {
                plugin: plugin.name.clone(),
                command: command.clone(),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildTarget, HookContext, PluginCommand};
    use serde_json::json;

    // ── helpers ─────────────────────────────────────────────────────────

    /// A hook that appends `tag` to the `trail` array of the config.
    fn tagging(tag: &'static str) -> impl Fn(&HookContext, Value) -> Value + Send + Sync {
        move |_: &HookContext, mut config: Value| {
            match config.get_mut("trail").and_then(Value::as_array_mut) {
                Some(trail) => trail.push(json!(tag)),
                None => config = json!({ "trail": [tag] }),
            }
            config
        }
    }

    fn run_browser(root: &ConfigNode) -> Value {
        root.derived()
            .and_then(|d| d.browser_config_chain())
            .expect("browser chain present")
            .apply(&HookContext::new(BuildTarget::Browser, false), json!({ "trail": [] }))
    }

    fn names(root: &ConfigNode) -> Vec<String> {
        root.derived()
            .expect("derived section")
            .plugin_objects()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    fn default_kit() -> ConfigNode {
        ConfigNode::builder()
            .name("default-kit")
            .hook(HookName::WebpackBrowserConfig, tagging("default"))
            .build()
    }

    #[cfg(unix)]
    const ABS: &str = "/srv/app/browser.js";
    #[cfg(windows)]
    const ABS: &str = "C:\\srv\\app\\browser.js";

    // ── plugin discovery ────────────────────────────────────────────────

    #[test]
    fn bare_root_yields_only_the_default_plugin() {
        let mut root = ConfigNode::new();
        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert_eq!(names(&root), vec!["default-kit"]);
        let origin = root.derived().unwrap().plugin_objects()[0].origin;
        assert_eq!(origin, PluginOrigin::Default);
    }

    #[test]
    fn skip_defaults_leaves_the_sequence_empty() {
        let mut root = ConfigNode::builder().skip_defaults(true).build();
        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert!(names(&root).is_empty());
        assert!(root.derived().unwrap().browser_config_chain().is_none());
    }

    #[test]
    fn nested_tree_flattens_in_declaration_order() {
        let plugin_b = ConfigNode::builder()
            .name("pluginB")
            .hook(HookName::WebpackBrowserConfig, tagging("b"))
            .build();
        let plugin_a = ConfigNode::builder()
            .name("pluginA")
            .hook(HookName::WebpackBrowserConfig, tagging("a"))
            .plugin(plugin_b)
            .build();
        let mut root = ConfigNode::builder()
            .hook(HookName::WebpackBrowserConfig, tagging("root"))
            .plugin(plugin_a)
            .build();

        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert_eq!(names(&root), vec!["default-kit", "root", "pluginA", "pluginB"]);
        let origins: Vec<_> = root
            .derived()
            .unwrap()
            .plugin_objects()
            .iter()
            .map(|p| p.origin)
            .collect();
        assert_eq!(
            origins,
            vec![
                PluginOrigin::Default,
                PluginOrigin::Root,
                PluginOrigin::Nested { depth: 1 },
                PluginOrigin::Nested { depth: 2 },
            ]
        );
        assert_eq!(
            run_browser(&root),
            json!({ "trail": ["default", "root", "a", "b"] })
        );
    }

    #[test]
    fn unnamed_plugins_are_labelled_by_path() {
        let mut root = ConfigNode::builder()
            .plugin(ConfigNode::builder().plugin(ConfigNode::new()).build())
            .build();
        Composer::new().compose(&mut root).unwrap();
        assert_eq!(names(&root), vec!["plugins[0]", "plugins[0].plugins[0]"]);
    }

    #[test]
    fn root_plugins_list_is_not_mutated() {
        let mut root = ConfigNode::builder()
            .plugin(ConfigNode::builder().name("only").build())
            .build();
        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert_eq!(root.plugins().len(), 1);
        assert_eq!(root.plugins()[0].name(), Some("only"));
    }

    // ── hook merge ──────────────────────────────────────────────────────

    #[test]
    fn later_plugin_wraps_root_hook() {
        // root = { plugins: [{ webpackBrowserConfig: f1 }], webpackBrowserConfig: f0 }
        let mut root = ConfigNode::builder()
            .skip_defaults(true)
            .hook(HookName::WebpackBrowserConfig, tagging("f0"))
            .plugin(
                ConfigNode::builder()
                    .hook(HookName::WebpackBrowserConfig, tagging("f1"))
                    .build(),
            )
            .build();

        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert_eq!(run_browser(&root), json!({ "trail": ["f0", "f1"] }));
    }

    #[test]
    fn three_hooks_compose_as_nested_calls() {
        let mut root = ConfigNode::builder()
            .plugin(
                ConfigNode::builder()
                    .hook(HookName::WebpackServerConfig, |_: &HookContext, v: Value| {
                        json!(v.as_i64().unwrap() + 1)
                    })
                    .build(),
            )
            .plugin(
                ConfigNode::builder()
                    .hook(HookName::WebpackServerConfig, |_: &HookContext, v: Value| {
                        json!(v.as_i64().unwrap() * 10)
                    })
                    .build(),
            )
            .plugin(
                ConfigNode::builder()
                    .hook(HookName::WebpackServerConfig, |_: &HookContext, v: Value| {
                        json!(v.as_i64().unwrap() - 3)
                    })
                    .build(),
            )
            .build();
        Composer::new().compose(&mut root).unwrap();

        let chain = root.derived().unwrap().server_config_chain().unwrap();
        let ctx = HookContext::new(BuildTarget::Server, false);
        // h3(h2(h1(2))) = ((2 + 1) * 10) - 3
        assert_eq!(chain.apply(&ctx, json!(2)), json!(27));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn hook_without_implementations_is_absent() {
        let mut root = ConfigNode::builder()
            .hook(HookName::WebpackBrowserConfig, tagging("only-browser"))
            .build();
        Composer::new().compose(&mut root).unwrap();

        let derived = root.derived().unwrap();
        assert!(derived.browser_config_chain().is_some());
        assert!(derived.server_config_chain().is_none());
    }

    #[test]
    fn non_function_hook_is_a_contract_violation() {
        let mut root = ConfigNode::builder()
            .plugin(
                ConfigNode::builder()
                    .name("broken")
                    .option("webpackBrowserConfig", json!(42))
                    .build(),
            )
            .build();

        let err = Composer::new().compose(&mut root).unwrap_err();
        assert_eq!(
            err,
            DomainError::PluginContractViolation {
                plugin: "broken".into(),
                hook: "webpackBrowserConfig".into(),
                found: "number".into(),
            }
        );
        assert!(root.derived().is_none(), "no Derived Section on failure");
    }

    #[test]
    fn function_under_unknown_key_is_rejected() {
        let mut root = ConfigNode::builder()
            .option(
                "webpackNodeConfig",
                OptionValue::Hook(crate::domain::hook_fn(|_, v| v)),
            )
            .build();
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::UnknownHook { ref key, .. }) if key == "webpackNodeConfig"
        ));
    }

    #[test]
    fn unknown_data_options_are_left_alone() {
        let mut root = ConfigNode::builder()
            .option("port", json!(3000))
            .option("webpackNodeConfig", json!("not a hook, just data"))
            .build();
        Composer::new().compose(&mut root).unwrap();
        assert_eq!(
            root.option("port").and_then(OptionValue::as_data),
            Some(&json!(3000))
        );
    }

    #[test]
    fn plugins_set_as_an_option_are_rejected() {
        let mut root = ConfigNode::builder()
            .option(
                "plugins",
                json!([{ "$name": "a", "webpackBrowserConfig": 42 }]),
            )
            .build();

        let err = Composer::new().compose(&mut root).unwrap_err();
        assert_eq!(
            err,
            DomainError::ReservedOption {
                location: "root config".into(),
                key: "plugins".into(),
                found: "array".into(),
                expected: "nested plugins belong in the plugin list".into(),
            }
        );
        assert!(root.derived().is_none());
    }

    #[test]
    fn reserved_options_are_type_checked_in_nested_plugins() {
        let mut nested = ConfigNode::new();
        nested.set_option("$name", json!(7));
        let mut root = ConfigNode::builder()
            .plugin(ConfigNode::builder().plugin(nested).build())
            .build();
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::ReservedOption { ref location, ref key, .. })
                if location == "plugins[0].plugins[0]" && key == "$name"
        ));

        let mut root = ConfigNode::new();
        root.set_option("skipDefaults", json!("yes"));
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::ReservedOption { ref key, .. }) if key == "skipDefaults"
        ));
    }

    // ── resources ───────────────────────────────────────────────────────

    #[test]
    fn resources_follow_flatten_order_without_dedup() {
        let mut root = ConfigNode::builder()
            .browser_config(ResourceDescriptor::new(ABS).with_config_name("root"))
            .plugin(
                ConfigNode::builder()
                    .browser_config(ResourceDescriptor::new(ABS).with_config_name("child"))
                    .build(),
            )
            .build();
        Composer::new().compose(&mut root).unwrap();

        let names: Vec<_> = root
            .derived()
            .unwrap()
            .resource_list()
            .iter()
            .map(|r| r.config_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["root", "child"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_resource_path_is_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = std::path::Path::new(OsStr::from_bytes(b"/srv/\xffapp/browser.js"));
        let mut root = ConfigNode::builder()
            .browser_config(ResourceDescriptor::new(path))
            .build();
        Composer::new().compose(&mut root).unwrap();

        assert_eq!(root.derived().unwrap().resource_list()[0].disk_path(), path);
    }

    #[test]
    fn relative_resource_built_in_code_is_rejected() {
        let mut root = ConfigNode::builder()
            .browser_config(ResourceDescriptor::new("browser.js"))
            .build();
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::InvalidResourceDescriptor { .. })
        ));
    }

    #[test]
    fn relative_resource_path_is_rejected() {
        let mut root = ConfigNode::builder()
            .option(BROWSER_CONFIG_KEY, json!({ "diskPath": "./browser.js" }))
            .build();
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::InvalidResourceDescriptor { .. })
        ));
        assert!(root.derived().is_none());
    }

    // ── commands ────────────────────────────────────────────────────────

    #[test]
    fn commands_are_collected_with_their_plugin() {
        let mut root = ConfigNode::builder()
            .plugin(
                ConfigNode::builder()
                    .name("aws")
                    .command(PluginCommand::new("aws-configure", "", |_| Ok(Vec::new())))
                    .build(),
            )
            .build();
        Composer::new().compose(&mut root).unwrap();

        let cmd = root.derived().unwrap().command("aws-configure").unwrap();
        assert_eq!(cmd.plugin, "aws");
    }

    #[test]
    fn duplicate_command_names_are_rejected() {
        let cmd = || PluginCommand::new("deploy", "", |_| Ok(Vec::new()));
        let mut root = ConfigNode::builder()
            .plugin(ConfigNode::builder().name("a").command(cmd()).build())
            .plugin(ConfigNode::builder().name("b").command(cmd()).build())
            .build();

        let err = Composer::new().compose(&mut root).unwrap_err();
        assert_eq!(
            err,
            DomainError::DuplicateCommand {
                name: "deploy".into(),
                first: "a".into(),
                second: "b".into(),
            }
        );
    }

    #[test]
    fn data_under_cli_commands_is_rejected() {
        let mut root = ConfigNode::builder()
            .option(CLI_COMMANDS_KEY, json!([{ "name": "x" }]))
            .build();
        assert!(matches!(
            Composer::new().compose(&mut root),
            Err(DomainError::InvalidCommand { .. })
        ));
    }

    // ── idempotence ─────────────────────────────────────────────────────

    #[test]
    fn composing_twice_changes_nothing() {
        let mut root = ConfigNode::builder()
            .hook(HookName::WebpackBrowserConfig, tagging("root"))
            .plugin(
                ConfigNode::builder()
                    .hook(HookName::WebpackBrowserConfig, tagging("p"))
                    .build(),
            )
            .build();
        let composer = Composer::with_default_plugin(default_kit());

        composer.compose(&mut root).unwrap();
        let first_names = names(&root);
        let first_trail = run_browser(&root);

        composer.compose(&mut root).unwrap();
        assert_eq!(names(&root), first_names);
        assert_eq!(run_browser(&root), first_trail);
        assert_eq!(
            root.derived().unwrap().browser_config_chain().unwrap().len(),
            3
        );
    }

    #[test]
    fn a_different_composer_does_not_recompose() {
        let mut root = ConfigNode::new();
        Composer::new().compose(&mut root).unwrap();
        Composer::with_default_plugin(default_kit())
            .compose(&mut root)
            .unwrap();

        assert!(names(&root).is_empty());
    }
}
