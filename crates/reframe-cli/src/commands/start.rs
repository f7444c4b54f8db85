//! `reframe start`: compose the app and prepare its build.

use tracing::instrument;

use reframe_core::application::ports::{BuildPlan, StartOptions};

use crate::{
    cli::{OutputFormat, StartArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(production = args.production))]
pub fn execute(args: StartArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let start = super::working_dir(args.dir.as_deref())?;
    let options = StartOptions {
        production: args.production,
        log: args.log,
        host: config.server.host,
        port: config.server.port,
    };

    let plan = super::start_service().prepare(&start, &options)?;

    if output.format() == OutputFormat::Json {
        return output.json(&plan);
    }
    print_plan(&plan, args.log, &output)
}

fn print_plan(plan: &BuildPlan, log: bool, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("Pages ({})", plan.pages.len()))?;
    for page in &plan.pages {
        output.print(&format!("  {}  {}", page.name, page.path.display()))?;
    }
    if !plan.resources.is_empty() {
        output.header(&format!("Browser configs ({})", plan.resources.len()))?;
        for resource in &plan.resources {
            output.print(&format!("  {}", resource.disk_path().display()))?;
        }
    }

    if log {
        output.header("Browser build")?;
        output.print(&pretty(&plan.browser_config)?)?;
        output.header("Server build")?;
        output.print(&pretty(&plan.server_config)?)?;
    }

    output.success(&format!(
        "Build plan ready for {} {}",
        plan.address,
        mode_label(plan.production)
    ))?;
    Ok(())
}

fn mode_label(production: bool) -> &'static str {
    if production { "[PROD]" } else { "[DEV]" }
}

fn pretty(value: &serde_json::Value) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Render {
        message: e.to_string(),
    })
}
