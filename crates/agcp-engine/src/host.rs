//! Run the host build tasks that publish tasks depend on.

use std::path::Path;
use std::process::Command;

use agcp_util::process::run_inherited;

use crate::error::EngineError;

/// Run one host task, e.g. `:mobile:bundleRelease`, through `build_command`.
///
/// `build_command` is split on whitespace; its first word is the program and
/// the rest are passed before the task name. Output goes straight to the
/// terminal.
///
/// # Errors
/// Returns an error if the command cannot be spawned or exits unsuccessfully.
pub fn run_host_task(root_dir: &Path, build_command: &str, task: &str) -> Result<(), EngineError> {
    let mut words = build_command.split_whitespace();
    let program = words.next().unwrap_or("./gradlew");
    let mut cmd = Command::new(program);
    cmd.args(words).arg(task).current_dir(root_dir);

    log::debug!("running {build_command} {task} in {}", root_dir.display());
    match run_inherited(&mut cmd)? {
        Some(0) => Ok(()),
        code => Err(EngineError::HostTask {
            task: task.to_owned(),
            code: code.unwrap_or(-1),
        }),
    }
}
