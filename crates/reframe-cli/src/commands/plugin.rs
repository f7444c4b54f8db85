//! Commands contributed by the current app's plugins.

use tracing::{debug, instrument};

use crate::{
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Run `reframe <name> [args...]` against the app in the current directory.
#[instrument(skip_all)]
pub fn execute(args: Vec<String>, output: OutputManager) -> CliResult<()> {
    let Some((name, rest)) = args.split_first() else {
        return Err(CliError::InvalidInput {
            message: "missing command name".into(),
            source: None,
        });
    };
    debug!(command = %name, args = rest.len(), "Dispatching plugin command");

    let start = super::working_dir(None)?;
    let app = super::start_service().load(&start)?;
    for line in app.run_command(name, rest.to_vec())? {
        output.success(&line)?;
    }
    Ok(())
}
