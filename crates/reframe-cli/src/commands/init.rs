//! Implementation of the `reframe init` command.
//!
//! Responsibility: resolve where the app goes, call the core scaffold
//! service, and display results.

use std::io::IsTerminal;
use std::path::Path;

use tracing::{info, instrument};

use reframe_adapters::{AppTemplate, LocalFilesystem};
use reframe_core::application::{ScaffoldReport, ScaffoldService};

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `reframe init` command.
///
/// 1. Plan the scaffold (validates the name, checks the target directory)
/// 2. Early-exit if `--dry-run`
/// 3. Confirm with the user unless `--yes`, configured off, or not a TTY
/// 4. Write the files
/// 5. Print next-steps guidance
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(args: InitArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let output_dir = super::working_dir(None)?;
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(AppTemplate::new()),
    )
    .allow_existing(args.force);

    let plan = service.plan(&args.name, &output_dir)?;

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            args.name,
            plan.root.display(),
        ))?;
        print_files(&plan, &output)?;
        return Ok(());
    }

    if args.force && plan.root.exists() {
        output.warning(&format!(
            "Writing into existing directory {}",
            plan.root.display()
        ))?;
    }

    let ask = !args.yes && !config.scaffold.skip_confirm && std::io::stdin().is_terminal();
    if ask {
        output.header(&format!("About to create '{}':", args.name))?;
        print_files(&plan, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    info!(path = %plan.root.display(), "Scaffold started");
    let report = service.scaffold(&args.name, &output_dir)?;

    output.success(&format!("App '{}' created!", args.name))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", args.name))?;
    output.print("  reframe start")?;

    info!(files = report.files.len(), "Scaffold completed");
    Ok(())
}

fn print_files(plan: &ScaffoldReport, output: &OutputManager) -> CliResult<()> {
    for file in &plan.files {
        output.print(&format!("  {}", relative(file, &plan.root).display()))?;
    }
    Ok(())
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation input".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
