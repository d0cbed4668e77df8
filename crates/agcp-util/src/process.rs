//! Process execution helpers for invoking host build tasks.

use std::process::Command;

use crate::error::UtilError;

/// Execute a command with inherited stdio, so the host build's output streams
/// straight to the terminal.
///
/// Returns the exit code (`None` when terminated by a signal) on completion.
///
/// # Errors
/// Returns an error if the command cannot be spawned.
pub fn run_inherited(cmd: &mut Command) -> Result<Option<i32>, UtilError> {
    let status = cmd.status().map_err(|source| UtilError::CommandExec {
        program: program_name(cmd),
        source,
    })?;
    Ok(status.code())
}

fn program_name(cmd: &Command) -> String {
    cmd.get_program().to_string_lossy().into_owned()
}
