//! Job execution: conditional gating, single commands, and pipelines.

use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::Path;
use std::process::{self, Child, ExitStatus};

use log::{debug, warn};

use self::pipeline::run_pipeline;
use self::simple::run_simple_command;
use self::stdio::{Output, Stdin};
use crate::errors::{ErrorKind, Result, ResultExt};
use crate::parser::Job;
use crate::util::MyshExitStatusExt;

mod pipeline;
mod simple;
pub mod stdio;

/// What the caller should do after a job has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitRequest {
    /// Keep reading lines
    Continue,
    /// `exit` ran: terminate normally
    Success,
    /// `die` ran: terminate with failure
    Failure,
}

/// Runs `job` after a job that finished with `last_status`.
///
/// Returns the new shell status (0 or 1) and whether the shell should exit.
/// A job whose `and`/`or` gate is not satisfied does not run and leaves the
/// status unchanged. In `batch_mode` the first program of the job reads from
/// the null device unless the shell's stdin is a terminal.
///
/// # Examples
///
/// ```
/// use mysh_rs::{execute_job, ExitRequest, Job, MyshExitStatusExt};
/// use std::process::ExitStatus;
///
/// let job = Job::parse("and exit");
/// let (status, request) = execute_job(&job, ExitStatus::from_failure(), true);
/// assert_eq!(status.code(), Some(1));
/// assert_eq!(request, ExitRequest::Continue);
/// ```
pub fn execute_job(
    job: &Job,
    last_status: ExitStatus,
    batch_mode: bool,
) -> (ExitStatus, ExitRequest) {
    if !job.conditional.permits(last_status.success()) {
        debug!("skipping '{}': {:?} not satisfied", job.input, job.conditional);
        return (last_status, ExitRequest::Continue);
    }

    debug!("executing {:?}", job);
    match job.commands.as_slice() {
        [] => (last_status, ExitRequest::Continue),
        [command] => run_simple_command(command, last_status, batch_mode),
        commands => (run_pipeline(commands, batch_mode), ExitRequest::Continue),
    }
}

/// Folds a program's exit status into a shell status: 0 for a normal exit
/// with code 0, 1 for anything else, including death by a signal.
fn shell_status(status: ExitStatus) -> ExitStatus {
    if status.success() {
        return ExitStatus::from_success();
    }

    if let Some(signal) = status.signal() {
        warn!("child terminated by signal {}", signal);
    }
    ExitStatus::from_failure()
}

/// Starts `path` with `argv` passed through unchanged, `argv[0]` included.
fn spawn_external(path: &Path, argv: &[String], stdin: Stdin, stdout: Output) -> Result<Child> {
    let mut command = process::Command::new(path);
    if let Some((arg0, args)) = argv.split_first() {
        command.arg0(arg0).args(args);
    }
    command.stdin(stdin).stdout(stdout);

    let child = command
        .spawn()
        .chain_err(|| ErrorKind::Exec(path.display().to_string()))?;
    debug!("spawned {} as {}", path.display(), child.id());
    Ok(child)
}
