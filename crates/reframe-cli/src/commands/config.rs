//! `reframe config`: show what composition derived for an app.

use reframe_core::domain::{DerivedSummary, PluginOrigin};

use crate::{
    cli::{ConfigArgs, ConfigFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ConfigArgs, output: OutputManager) -> CliResult<()> {
    let start = super::working_dir(args.dir.as_deref())?;
    let app = super::start_service().load(&start)?;
    let summary = app.derived()?.summary();

    match args.format {
        ConfigFormat::Json => output.json(&summary),
        ConfigFormat::Toml => {
            let text = toml::to_string_pretty(&summary).map_err(|e| CliError::Render {
                message: e.to_string(),
            })?;
            Ok(output.print(text.trim_end())?)
        }
        ConfigFormat::Table => {
            match &app.files.config_path {
                Some(path) => output.info(&format!("Config: {}", path.display()))?,
                None => output.warning("No reframe.toml found, using defaults")?,
            }
            print_table(&summary, &output)
        }
    }
}

fn print_table(summary: &DerivedSummary, output: &OutputManager) -> CliResult<()> {
    output.header("Plugins")?;
    for plugin in &summary.plugins {
        output.print(&format!("  {:<24} {}", plugin.name, origin_label(plugin.origin)))?;
    }

    output.header("Hooks")?;
    if summary.hooks.is_empty() {
        output.print("  (none)")?;
    }
    for (hook, contributors) in &summary.hooks {
        output.print(&format!("  {:<24} {}", hook, contributors.join(" → ")))?;
    }

    output.header("Browser configs")?;
    if summary.resources.is_empty() {
        output.print("  (none)")?;
    }
    for resource in &summary.resources {
        let label = resource.config_name.as_deref().unwrap_or("-");
        output.print(&format!(
            "  {:<24} {}",
            label,
            resource.disk_path().display()
        ))?;
    }

    output.header("Commands")?;
    if summary.commands.is_empty() {
        output.print("  (none)")?;
    }
    for command in &summary.commands {
        let usage = match &command.params {
            Some(params) => format!("{} {}", command.name, params),
            None => command.name.clone(),
        };
        output.print(&format!(
            "  {:<40} {} ({})",
            usage, command.description, command.plugin
        ))?;
    }
    Ok(())
}

fn origin_label(origin: PluginOrigin) -> String {
    match origin {
        PluginOrigin::Default => "default".into(),
        PluginOrigin::Root => "app".into(),
        PluginOrigin::Nested { depth: 1 } => "plugin".into(),
        PluginOrigin::Nested { depth } => format!("nested plugin (depth {depth})"),
    }
}
