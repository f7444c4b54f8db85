//! Scaffold Service - writes a new app for `reframe init`.
//!
//! This service coordinates the scaffolding workflow:
//! 1. Validate the project name
//! 2. Resolve the files from the `ScaffoldSource` port
//! 3. Write them through the `Filesystem` port, rolling back on failure

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ScaffoldSource},
    },
    error::ReframeResult,
};

/// What a scaffold run wrote (or would write, for a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    source: Box<dyn ScaffoldSource>,
    allow_existing: bool,
}

impl ScaffoldService {
    pub fn new(filesystem: Box<dyn Filesystem>, source: Box<dyn ScaffoldSource>) -> Self {
        Self {
            filesystem,
            source,
            allow_existing: false,
        }
    }

    /// Write into an existing directory instead of failing with `ProjectExists`.
    pub fn allow_existing(mut self, allow: bool) -> Self {
        self.allow_existing = allow;
        self
    }

    /// Check everything and list the files, without writing.
    pub fn plan(&self, project_name: &str, output_dir: &Path) -> ReframeResult<ScaffoldReport> {
        validate_project_name(project_name)?;

        let root = output_dir.join(project_name);
        if self.filesystem.exists(&root) && !self.allow_existing {
            return Err(ApplicationError::ProjectExists { path: root }.into());
        }

        let files = self
            .source
            .files(project_name)
            .into_iter()
            .map(|f| root.join(f.path))
            .collect();
        Ok(ScaffoldReport { root, files })
    }

    /// Scaffold a new app named `project_name` inside `output_dir`.
    #[instrument(
        skip_all,
        fields(project = %project_name, output_dir = %output_dir.display())
    )]
    pub fn scaffold(&self, project_name: &str, output_dir: &Path) -> ReframeResult<ScaffoldReport> {
        let report = self.plan(project_name, output_dir)?;
        let created_root = !self.filesystem.exists(&report.root);

        match self.write_all(&report.root, project_name) {
            Ok(()) => {
                info!(files = report.files.len(), "Scaffold completed successfully");
                Ok(report)
            }
            Err(e) => {
                if created_root {
                    warn!("Write failed, attempting rollback");
                    self.rollback(&report.root);
                } else {
                    warn!("Write failed inside an existing directory, leaving it in place");
                }
                Err(e)
            }
        }
    }

    fn write_all(&self, root: &Path, project_name: &str) -> ReframeResult<()> {
        self.filesystem.create_dir_all(root)?;

        for file in self.source.files(project_name) {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, &file.content)?;
        }

        Ok(())
    }

    /// Best-effort rollback on failure.
    fn rollback(&self, root: &Path) {
        if let Err(e) = self.filesystem.remove_dir_all(root) {
            warn!(
                error = %e,
                path = %root.display(),
                "Rollback failed"
            );
        } else {
            info!("Rollback successful");
        }
    }
}

/// Project names become directory names and the `name` of the app.
pub fn validate_project_name(name: &str) -> Result<(), ApplicationError> {
    let invalid = |reason: &str| ApplicationError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name cannot be empty"));
    };
    if !first.is_ascii_alphanumeric() {
        return Err(invalid("name must start with a letter or digit"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}
