//! Plugins and hook transforms that ship with Reframe.
//!
//! - `default-kit`: baseline browser/server build settings; the composer's
//!   default plugin, so it runs first in every chain.
//! - `aws`: contributes the `aws-configure` command.
//! - transforms `minify` (browser only) and `source-maps`, referenced by name
//!   from `reframe.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::debug;

use reframe_core::domain::{
    BuildTarget, CommandInvocation, CommandOutput, ConfigNode, DomainError, HookContext, HookFn,
    HookName, PluginCommand, hook_fn,
};

pub const DEFAULT_KIT: &str = "default-kit";
pub const AWS: &str = "aws";

pub const MINIFY: &str = "minify";
pub const SOURCE_MAPS: &str = "source-maps";

/// The config as a table; non-table values are replaced by an empty one.
fn into_table(config: Value) -> Map<String, Value> {
    match config {
        Value::Object(table) => table,
        _ => Map::new(),
    }
}

// ── default-kit ──────────────────────────────────────────────────────────────

fn baseline(ctx: &HookContext, config: Value) -> Value {
    let mut table = into_table(config);
    let mode = if ctx.production { "production" } else { "development" };
    let devtool = if ctx.production {
        Value::Bool(false)
    } else {
        json!("eval-cheap-module-source-map")
    };
    let defaults = match ctx.target {
        BuildTarget::Browser => [
            ("target", json!("web")),
            ("optimization", json!({ "minimize": ctx.production })),
        ],
        BuildTarget::Server => [
            ("target", json!("node")),
            ("externalsPresets", json!({ "node": true })),
        ],
    };

    for (key, value) in [("mode", json!(mode)), ("devtool", devtool)]
        .into_iter()
        .chain(defaults)
    {
        table.entry(key).or_insert(value);
    }
    Value::Object(table)
}

/// Baseline build settings for both bundles.
pub fn default_kit() -> ConfigNode {
    ConfigNode::builder()
        .name(DEFAULT_KIT)
        .hook(HookName::WebpackBrowserConfig, baseline)
        .hook(HookName::WebpackServerConfig, baseline)
        .build()
}

// ── aws ──────────────────────────────────────────────────────────────────────

const AWS_CONFIGURE: &str = "aws-configure";

/// The `aws` plugin, writing into the current user's home directory.
pub fn aws() -> ConfigNode {
    aws_in(dirs::home_dir())
}

/// The `aws` plugin writing below `home`; `None` makes the command fail.
pub fn aws_in(home: Option<PathBuf>) -> ConfigNode {
    let command = PluginCommand::new(
        AWS_CONFIGURE,
        "Create/Overwrite ~/.aws/config and ~/.aws/credentials",
        move |invocation: &CommandInvocation| aws_configure(home.as_deref(), invocation),
    )
    .with_params("[access-key-id] [secret-access-key] [region]");

    ConfigNode::builder().name(AWS).command(command).build()
}

fn aws_configure(
    home: Option<&Path>,
    invocation: &CommandInvocation,
) -> Result<CommandOutput, DomainError> {
    let [access_key_id, secret_access_key, region] = invocation.args.as_slice() else {
        return Err(DomainError::CommandFailed {
            name: AWS_CONFIGURE.into(),
            reason: format!(
                "expected 3 arguments (access-key-id, secret-access-key, region), got {}",
                invocation.args.len()
            ),
        });
    };
    let io_failed = |path: &Path, reason: String| DomainError::CommandIo {
        name: AWS_CONFIGURE.into(),
        path: path.to_path_buf(),
        reason,
    };
    let home = home.ok_or_else(|| {
        io_failed(
            Path::new("~/.aws"),
            "cannot determine the home directory".into(),
        )
    })?;

    let dir = home.join(".aws");
    fs::create_dir_all(&dir).map_err(|e| io_failed(&dir, e.to_string()))?;

    let config_file = dir.join("config");
    let credentials_file = dir.join("credentials");
    let files = [
        (&config_file, format!("\n[default]\nregion = {region}\n")),
        (
            &credentials_file,
            format!(
                "\n[default]\naws_access_key_id = {access_key_id}\naws_secret_access_key = {secret_access_key}\n"
            ),
        ),
    ];
    for (path, content) in &files {
        fs::write(path, content).map_err(|e| io_failed(path, e.to_string()))?;
        debug!(path = %path.display(), "Wrote aws file");
    }

    Ok(vec![
        format!("{} created.", dir.display()),
        format!("{} created.", config_file.display()),
        format!("{} created.", credentials_file.display()),
    ])
}

// ── Transforms ───────────────────────────────────────────────────────────────

/// Named transforms as `(hook, name, function)`.
pub fn transforms() -> Vec<(HookName, &'static str, HookFn)> {
    let source_maps = hook_fn(|_: &HookContext, config: Value| {
        let mut table = into_table(config);
        table.insert("devtool".into(), json!("source-map"));
        Value::Object(table)
    });
    let minify = hook_fn(|_: &HookContext, config: Value| {
        let mut table = into_table(config);
        let mut optimization = into_table(table.remove("optimization").unwrap_or_default());
        optimization.insert("minimize".into(), Value::Bool(true));
        table.insert("optimization".into(), Value::Object(optimization));
        Value::Object(table)
    });

    vec![
        (HookName::WebpackBrowserConfig, MINIFY, minify),
        (HookName::WebpackBrowserConfig, SOURCE_MAPS, source_maps.clone()),
        (HookName::WebpackServerConfig, SOURCE_MAPS, source_maps),
    ]
}
