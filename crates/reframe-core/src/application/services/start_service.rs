//! Start Service - load, compose and hand an app to the bootstrap.
//!
//! Workflow:
//! 1. Locate `reframe.toml` and `pages/` from a starting directory
//! 2. Load the root config (an app without `reframe.toml` gets an empty one)
//! 3. Compose it
//! 4. Pass the composed config to the `Bootstrap` port

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{AppFiles, Bootstrap, BuildPlan, ConfigSource, ProjectLocator, StartOptions},
    },
    domain::{CommandInvocation, CommandOutput, Composer, ConfigNode, DerivedSection},
    error::{ReframeError, ReframeResult},
};

/// A located, loaded and composed app.
#[derive(Debug, Clone)]
pub struct LoadedApp {
    pub files: AppFiles,
    pub config: ConfigNode,
}

impl LoadedApp {
    /// The Derived Section; always present once loaded through [`StartService`].
    pub fn derived(&self) -> ReframeResult<&DerivedSection> {
        self.config.derived().ok_or_else(|| ReframeError::Internal {
            message: "loaded config has no derived section".into(),
        })
    }

    /// Run a plugin-contributed command by name.
    #[instrument(skip(self, args), fields(app = %self.files.app_dir.display()))]
    pub fn run_command(&self, name: &str, args: Vec<String>) -> ReframeResult<CommandOutput> {
        let registered = self.derived()?.command(name).ok_or_else(|| {
            ApplicationError::UnknownCommand {
                name: name.to_string(),
            }
        })?;
        debug!(plugin = %registered.plugin, "Running plugin command");

        let invocation = CommandInvocation {
            args,
            app_dir: Some(self.files.app_dir.clone()),
        };
        Ok(registered.command.run(&invocation)?)
    }
}

/// Orchestrates `reframe start` and everything else that needs a composed app.
pub struct StartService {
    locator: Box<dyn ProjectLocator>,
    source: Box<dyn ConfigSource>,
    bootstrap: Box<dyn Bootstrap>,
    composer: Composer,
}

impl StartService {
    pub fn new(
        locator: Box<dyn ProjectLocator>,
        source: Box<dyn ConfigSource>,
        bootstrap: Box<dyn Bootstrap>,
        composer: Composer,
    ) -> Self {
        Self {
            locator,
            source,
            bootstrap,
            composer,
        }
    }

    /// Locate, load and compose the app containing `start`.
    ///
    /// Does not require a `pages/` directory, so plugin commands and
    /// `reframe config` work anywhere inside an app.
    #[instrument(skip_all, fields(start = %start.display()))]
    pub fn load(&self, start: &Path) -> ReframeResult<LoadedApp> {
        let files = self.locator.locate(start)?;
        debug!(app_dir = %files.app_dir.display(), "App located");

        let mut config = match &files.config_path {
            Some(path) => self.source.load(path)?,
            None => {
                debug!("No reframe.toml found, using an empty config");
                ConfigNode::new()
            }
        };

        self.composer.compose(&mut config)?;
        Ok(LoadedApp { files, config })
    }

    /// Everything `reframe start` does up to serving.
    #[instrument(skip_all, fields(start = %start.display(), production = options.production))]
    pub fn prepare(&self, start: &Path, options: &StartOptions) -> ReframeResult<BuildPlan> {
        let app = self.load(start)?;
        if app.files.pages_dir.is_none() {
            return Err(ApplicationError::AppFilesNotFound {
                missing: "pages",
                searched_from: start.to_path_buf(),
            }
            .into());
        }

        let plan = self.bootstrap.launch(&app.config, &app.files, options)?;
        info!(pages = plan.pages.len(), address = %plan.address, "App prepared");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::application::ports::output::{MockBootstrap, MockConfigSource, MockProjectLocator};
    use crate::domain::{DomainError, HookContext, HookName, PluginCommand};

    fn app_files(pages: bool, config: bool) -> AppFiles {
        AppFiles {
            app_dir: PathBuf::from("/srv/app"),
            config_path: config.then(|| PathBuf::from("/srv/app/reframe.toml")),
            pages_dir: pages.then(|| PathBuf::from("/srv/app/pages")),
        }
    }

    fn locator(files: AppFiles) -> Box<MockProjectLocator> {
        let mut locator = MockProjectLocator::new();
        locator
            .expect_locate()
            .returning(move |_| Ok(files.clone()));
        Box::new(locator)
    }

    fn plan() -> BuildPlan {
        BuildPlan {
            address: "http://localhost:3000".into(),
            production: false,
            browser_config: json!({}),
            server_config: json!({}),
            pages: vec![],
            resources: vec![],
        }
    }

    fn unused_bootstrap() -> Box<MockBootstrap> {
        let mut bootstrap = MockBootstrap::new();
        bootstrap.expect_launch().never();
        Box::new(bootstrap)
    }

    #[test]
    fn load_without_config_file_composes_empty_root() {
        let mut source = MockConfigSource::new();
        source.expect_load().never();

        let service = StartService::new(
            locator(app_files(true, false)),
            Box::new(source),
            unused_bootstrap(),
            Composer::with_default_plugin(ConfigNode::builder().name("kit").build()),
        );

        let app = service.load(Path::new("/srv/app")).unwrap();
        let names: Vec<_> = app
            .derived()
            .unwrap()
            .plugin_objects()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["kit"]);
    }

    #[test]
    fn load_reads_the_located_config() {
        let mut source = MockConfigSource::new();
        source
            .expect_load()
            .withf(|path| path.ends_with("reframe.toml"))
            .times(1)
            .returning(|_| {
                Ok(ConfigNode::builder()
                    .hook(HookName::WebpackServerConfig, |_: &HookContext, v| v)
                    .build())
            });

        let service = StartService::new(
            locator(app_files(true, true)),
            Box::new(source),
            unused_bootstrap(),
            Composer::new(),
        );

        let app = service.load(Path::new("/srv/app/pages")).unwrap();
        assert!(app.derived().unwrap().server_config_chain().is_some());
    }

    #[test]
    fn prepare_requires_pages_directory() {
        let service = StartService::new(
            locator(app_files(false, false)),
            Box::new(MockConfigSource::new()),
            unused_bootstrap(),
            Composer::new(),
        );

        let err = service
            .prepare(Path::new("/srv/app"), &StartOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ReframeError::Application(ApplicationError::AppFilesNotFound { missing: "pages", .. })
        ));
    }

    #[test]
    fn prepare_hands_composed_config_to_bootstrap() {
        let mut bootstrap = MockBootstrap::new();
        bootstrap
            .expect_launch()
            .withf(|config, files, options| {
                config.derived().is_some_and(DerivedSection::is_complete)
                    && files.pages_dir.is_some()
                    && options.production
            })
            .times(1)
            .returning(|_, _, _| Ok(plan()));

        let service = StartService::new(
            locator(app_files(true, false)),
            Box::new(MockConfigSource::new()),
            Box::new(bootstrap),
            Composer::new(),
        );

        let options = StartOptions {
            production: true,
            ..StartOptions::default()
        };
        let plan = service.prepare(Path::new("/srv/app"), &options).unwrap();
        assert_eq!(plan.address, "http://localhost:3000");
    }

    #[test]
    fn composition_errors_stop_before_bootstrap() {
        let mut source = MockConfigSource::new();
        source.expect_load().returning(|_| {
            Ok(ConfigNode::builder()
                .option(HookName::WebpackBrowserConfig.as_str(), json!(42))
                .build())
        });

        let service = StartService::new(
            locator(app_files(true, true)),
            Box::new(source),
            unused_bootstrap(),
            Composer::new(),
        );

        let err = service
            .prepare(Path::new("/srv/app"), &StartOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ReframeError::Domain(DomainError::PluginContractViolation { .. })
        ));
    }

    #[test]
    fn run_command_dispatches_to_plugin() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let deploy = PluginCommand::new("deploy", "Deploy the app", move |inv| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!(
                "{} {}",
                inv.app_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_default(),
                inv.args.join(",")
            )])
        });

        let mut source = MockConfigSource::new();
        source.expect_load().returning(move |_| {
            Ok(ConfigNode::builder()
                .plugin(ConfigNode::builder().name("deployer").command(deploy.clone()).build())
                .build())
        });

        let service = StartService::new(
            locator(app_files(false, true)),
            Box::new(source),
            unused_bootstrap(),
            Composer::new(),
        );

        let app = service.load(Path::new("/srv/app")).unwrap();
        let out = app.run_command("deploy", vec!["eu".into()]).unwrap();
        assert_eq!(out, vec!["/srv/app eu"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let err = app.run_command("missing", vec![]).unwrap_err();
        assert!(matches!(
            err,
            ReframeError::Application(ApplicationError::UnknownCommand { .. })
        ));
    }
}
