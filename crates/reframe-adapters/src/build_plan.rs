//! Bootstrap adapter producing a [`BuildPlan`].
//!
//! Reads the Derived Section of a composed config: runs the browser and
//! server hook chains over baseline bundle settings and lists the pages to
//! build. Serving the plan is left to the bundler/server integration.

use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use reframe_core::{
    application::{
        ApplicationError,
        ports::{AppFiles, Bootstrap, BuildPlan, PageEntry, StartOptions},
    },
    domain::{BuildTarget, ConfigNode, DerivedSection, HookContext, HookName},
    error::{ReframeError, ReframeResult},
};

/// Directory (inside the app) that build output goes to.
pub const BUILD_DIR_NAME: &str = ".build";

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildPlanner;

impl BuildPlanner {
    pub fn new() -> Self {
        Self
    }
}

impl Bootstrap for BuildPlanner {
    #[instrument(skip_all, fields(app = %files.app_dir.display()))]
    fn launch(
        &self,
        config: &ConfigNode,
        files: &AppFiles,
        options: &StartOptions,
    ) -> ReframeResult<BuildPlan> {
        let derived = config.derived().ok_or_else(|| ReframeError::Internal {
            message: "bootstrap received a config that was not composed".into(),
        })?;

        let pages = match &files.pages_dir {
            Some(dir) => list_pages(dir)?,
            None => Vec::new(),
        };
        if options.log {
            for page in &pages {
                info!(page = %page.name, path = %page.path.display(), "Page found");
            }
        }

        let browser_config = run_chain(
            derived,
            HookName::WebpackBrowserConfig,
            options.production,
            baseline(files, &pages, BuildTarget::Browser),
        )?;
        let server_config = run_chain(
            derived,
            HookName::WebpackServerConfig,
            options.production,
            baseline(files, &pages, BuildTarget::Server),
        )?;

        Ok(BuildPlan {
            address: format!("http://{}:{}", options.host, options.port),
            production: options.production,
            browser_config,
            server_config,
            pages,
            resources: derived.resource_list().to_vec(),
        })
    }
}

/// Every file below `pages/`, named by its relative path without extension.
fn list_pages(dir: &Path) -> ReframeResult<Vec<PageEntry>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ApplicationError::FilesystemError {
            path: dir.to_path_buf(),
            reason: format!("directory walk error: {e}"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        pages.push(PageEntry {
            name,
            path: path.to_path_buf(),
        });
    }
    debug!(count = pages.len(), "Pages listed");
    Ok(pages)
}

/// Bundle settings before any plugin touched them.
fn baseline(files: &AppFiles, pages: &[PageEntry], target: BuildTarget) -> Value {
    let entry: Map<String, Value> = pages
        .iter()
        .map(|page| (page.name.clone(), json!(page.path.display().to_string())))
        .collect();
    let output = files.app_dir.join(BUILD_DIR_NAME).join(target.to_string());

    json!({
        "context": files.app_dir.display().to_string(),
        "entry": entry,
        "output": { "path": output.display().to_string() },
    })
}

fn run_chain(
    derived: &DerivedSection,
    hook: HookName,
    production: bool,
    input: Value,
) -> ReframeResult<Value> {
    let Some(chain) = derived.hook_chain(hook) else {
        return Ok(input);
    };
    let ctx = HookContext::new(hook.target(), production);
    let output = chain.apply(&ctx, input);
    if !output.is_object() {
        return Err(ApplicationError::BootstrapFailed {
            reason: format!(
                "{hook} chain ({}) must return a table",
                chain.contributors().join(" → ")
            ),
        }
        .into());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_plugins::default_kit;
    use reframe_core::domain::Composer;
    use std::fs;
    use tempfile::TempDir;

    fn app_with_pages(pages: &[&str]) -> (TempDir, AppFiles) {
        let temp = TempDir::new().unwrap();
        let pages_dir = temp.path().join("pages");
        for page in pages {
            let path = pages_dir.join(page);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        fs::create_dir_all(&pages_dir).unwrap();
        let files = AppFiles {
            app_dir: temp.path().to_path_buf(),
            config_path: None,
            pages_dir: Some(pages_dir),
        };
        (temp, files)
    }

    fn composed(mut root: ConfigNode, composer: Composer) -> ConfigNode {
        composer.compose(&mut root).unwrap();
        root
    }

    #[test]
    fn plan_lists_pages_and_applies_chains() {
        let (_temp, files) = app_with_pages(&["home.toml", "blog/post.toml"]);
        let root = composed(
            ConfigNode::builder()
                .hook(HookName::WebpackBrowserConfig, |_: &HookContext, mut c: Value| {
                    c["plugins"] = json!(["analyzer"]);
                    c
                })
                .build(),
            Composer::with_default_plugin(default_kit()),
        );

        let options = StartOptions {
            production: true,
            ..StartOptions::default()
        };
        let plan = BuildPlanner::new().launch(&root, &files, &options).unwrap();

        let names: Vec<_> = plan.pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["blog/post", "home"]);
        assert_eq!(plan.address, "http://localhost:3000");
        assert_eq!(plan.browser_config["mode"], "production");
        assert_eq!(plan.browser_config["plugins"], json!(["analyzer"]));
        assert!(plan.browser_config["entry"]["home"].is_string());
        assert_eq!(plan.server_config["target"], "node");
    }

    #[test]
    fn without_hooks_baseline_passes_through() {
        let (_temp, files) = app_with_pages(&[]);
        let root = composed(ConfigNode::new(), Composer::new());

        let plan = BuildPlanner::new()
            .launch(&root, &files, &StartOptions::default())
            .unwrap();
        assert!(plan.pages.is_empty());
        assert!(plan.browser_config["output"]["path"]
            .as_str()
            .unwrap()
            .ends_with("browser"));
    }

    #[test]
    fn non_table_hook_result_fails() {
        let (_temp, files) = app_with_pages(&[]);
        let root = composed(
            ConfigNode::builder()
                .name("broken")
                .hook(HookName::WebpackServerConfig, |_: &HookContext, _| json!(null))
                .build(),
            Composer::new(),
        );

        let err = BuildPlanner::new()
            .launch(&root, &files, &StartOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ReframeError::Application(ApplicationError::BootstrapFailed { .. })
        ));
    }

    #[test]
    fn uncomposed_config_is_rejected() {
        let (_temp, files) = app_with_pages(&[]);
        let err = BuildPlanner::new()
            .launch(&ConfigNode::new(), &files, &StartOptions::default())
            .unwrap_err();
        assert!(matches!(err, ReframeError::Internal { .. }));
    }
}
