//! Hook names, hook functions, and merged hook chains.
//!
//! A hook is a named slot that transforms a build configuration. Several
//! plugins may fill the same slot; the composer folds them into a
//! [`HookChain`] where each layer receives the previous layer's output.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── HookName ─────────────────────────────────────────────────────────────────

/// The fixed set of hooks the composer knows how to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HookName {
    /// Modifies the browser-side bundle configuration.
    #[serde(rename = "webpackBrowserConfig")]
    WebpackBrowserConfig,
    /// Modifies the server-side bundle configuration.
    #[serde(rename = "webpackServerConfig")]
    WebpackServerConfig,
}

impl HookName {
    /// Every recognized hook, in the order chains are built.
    pub const ALL: [HookName; 2] = [Self::WebpackBrowserConfig, Self::WebpackServerConfig];

    /// The option key a plugin uses to declare this hook.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebpackBrowserConfig => "webpackBrowserConfig",
            Self::WebpackServerConfig => "webpackServerConfig",
        }
    }

    /// Resolve an option key to a hook name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == key)
    }

    /// Which build this hook modifies.
    pub const fn target(self) -> BuildTarget {
        match self {
            Self::WebpackBrowserConfig => BuildTarget::Browser,
            Self::WebpackServerConfig => BuildTarget::Server,
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two builds a Reframe app produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    Browser,
    Server,
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser => write!(f, "browser"),
            Self::Server => write!(f, "server"),
        }
    }
}

// ── Hook functions ───────────────────────────────────────────────────────────

/// Context handed to every hook alongside the value being transformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    pub target: BuildTarget,
    pub production: bool,
}

impl HookContext {
    pub fn new(target: BuildTarget, production: bool) -> Self {
        Self { target, production }
    }
}

/// A single hook implementation: takes the current config, returns the next.
pub type HookFn = Arc<dyn Fn(&HookContext, Value) -> Value + Send + Sync>;

/// Wrap a closure as a [`HookFn`].
pub fn hook_fn<F>(f: F) -> HookFn
where
    F: Fn(&HookContext, Value) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

// ── HookChain ────────────────────────────────────────────────────────────────

/// One contribution to a chain: which plugin provided which function.
#[derive(Clone)]
struct ChainLayer {
    plugin: String,
    hook: HookFn,
}

/// All implementations of one hook, merged in flatten order.
///
/// Invariant: never empty. An absent hook is represented by `None` in the
/// Derived Section, not by an empty chain.
#[derive(Clone)]
pub struct HookChain {
    name: HookName,
    layers: Vec<ChainLayer>,
}

impl HookChain {
    pub(crate) fn new(name: HookName, plugin: impl Into<String>, hook: HookFn) -> Self {
        Self {
            name,
            layers: vec![ChainLayer {
                plugin: plugin.into(),
                hook,
            }],
        }
    }

    /// Wrap the chain with another layer; it sees the result of every
    /// layer pushed before it.
    pub(crate) fn wrap(&mut self, plugin: impl Into<String>, hook: HookFn) {
        self.layers.push(ChainLayer {
            plugin: plugin.into(),
            hook,
        });
    }

    pub fn name(&self) -> HookName {
        self.name
    }

    /// Names of the contributing plugins, innermost first.
    pub fn contributors(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.plugin.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run every layer: `hN(...h2(h1(input)))`.
    pub fn apply(&self, ctx: &HookContext, input: Value) -> Value {
        self.layers
            .iter()
            .fold(input, |config, layer| (layer.hook)(ctx, config))
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("name", &self.name)
            .field("contributors", &self.contributors())
            .finish()
    }
}
