//! Finds the app a directory belongs to.
//!
//! Walks up from the start directory. The first ancestor holding
//! `reframe.toml` is the app; failing that, the first ancestor holding a
//! `pages/` directory; failing both, the start directory itself.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use reframe_core::{
    application::{
        ApplicationError,
        ports::{AppFiles, ProjectLocator},
    },
    error::ReframeResult,
};

use crate::config_source::CONFIG_FILE_NAME;

pub const PAGES_DIR_NAME: &str = "pages";

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProjectLocator;

impl LocalProjectLocator {
    pub fn new() -> Self {
        Self
    }
}

impl ProjectLocator for LocalProjectLocator {
    #[instrument(skip(self), fields(start = %start.display()))]
    fn locate(&self, start: &Path) -> ReframeResult<AppFiles> {
        let start = start
            .canonicalize()
            .map_err(|e| ApplicationError::FilesystemError {
                path: start.to_path_buf(),
                reason: e.to_string(),
            })?;

        let with_config = start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE_NAME).is_file());
        let app_dir = with_config
            .or_else(|| {
                start
                    .ancestors()
                    .find(|dir| dir.join(PAGES_DIR_NAME).is_dir())
            })
            .unwrap_or(start.as_path())
            .to_path_buf();

        let files = AppFiles {
            config_path: with_config.map(|dir| dir.join(CONFIG_FILE_NAME)),
            pages_dir: existing_dir(app_dir.join(PAGES_DIR_NAME)),
            app_dir,
        };
        debug!(
            config = ?files.config_path,
            pages = ?files.pages_dir,
            "Located app files"
        );
        Ok(files)
    }
}

fn existing_dir(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}
