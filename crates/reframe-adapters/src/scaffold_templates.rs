//! Files written by `reframe init`.

use reframe_core::application::ports::{ScaffoldFile, ScaffoldSource};

use crate::builtin_plugins::SOURCE_MAPS;
use crate::config_source::CONFIG_FILE_NAME;

/// The starter app: a config, one page and its view.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppTemplate;

impl AppTemplate {
    pub fn new() -> Self {
        Self
    }
}

impl ScaffoldSource for AppTemplate {
    fn files(&self, project_name: &str) -> Vec<ScaffoldFile> {
        vec![
            ScaffoldFile::new(CONFIG_FILE_NAME, config_file(project_name)),
            ScaffoldFile::new("pages/home.toml", home_page(project_name)),
            ScaffoldFile::new("views/home.html", home_view(project_name)),
            ScaffoldFile::new(".gitignore", "/.build/\n"),
        ]
    }
}

fn config_file(project_name: &str) -> String {
    format!(
        r#""$name" = "{project_name}"

# Installed plugins by name, or inline tables:
#   plugins = ["aws", {{ "$name" = "assets", browserConfig = {{ diskPath = "/abs/path" }} }}]
plugins = []

# Named transforms for the build configuration:
# webpackBrowserConfig = "{SOURCE_MAPS}"
"#
    )
}

fn home_page(project_name: &str) -> String {
    format!(
        r#"route = "/"
title = "{project_name}"
view = "views/home.html"
"#
    )
}

fn home_view(project_name: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head><title>{project_name}</title></head>
  <body>
    <h1>Welcome to {project_name}</h1>
  </body>
</html>
"#
    )
}
