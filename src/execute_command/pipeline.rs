//! Runs jobs of two or more commands connected by pipes.
//!
//! All stages are started, left to right, before any is waited for. Every
//! started stage is reaped before a status is reported, and only the last
//! stage decides that status.

use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::process::{self, Child, ExitStatus};

use log::{debug, warn};
use nix::libc;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use super::stdio::{self, Output, Stdin};
use super::{shell_status, spawn_external};
use crate::builtins;
use crate::errors::{self, Error, ErrorKind, Result, ResultExt};
use crate::parser::Command;
use crate::resolver;
use crate::util::MyshExitStatusExt;

/// One started (or unstartable) pipeline stage.
#[derive(Debug)]
enum Stage {
    /// The stage never ran; its status is already known.
    Finished(ExitStatus),
    External(Child),
    /// A builtin running in a forked copy of the shell.
    Forked(Pid),
}

impl Stage {
    fn id(&self) -> Option<Pid> {
        match self {
            Stage::Finished(_) => None,
            Stage::External(child) => Some(Pid::from_raw(child.id() as libc::pid_t)),
            Stage::Forked(pid) => Some(*pid),
        }
    }

    fn wait(self) -> Result<ExitStatus> {
        match self {
            Stage::Finished(status) => Ok(status),
            Stage::External(mut child) => child.wait().chain_err(|| "failed to wait for child"),
            Stage::Forked(pid) => wait_for_process(pid),
        }
    }
}

/// Runs `commands` as a pipeline and returns the shell status of the last one.
pub fn run_pipeline(commands: &[Command], batch_mode: bool) -> ExitStatus {
    let stages = match spawn_stages(commands, batch_mode) {
        Ok(stages) => stages,
        Err(e) => {
            errors::report(&e);
            return ExitStatus::from_failure();
        }
    };

    wait_for_stages(stages)
        .last()
        .map(|&(_, status)| status)
        .unwrap_or_else(ExitStatus::from_success)
}

/// Creates every pipe, then starts every stage. Fails only if the pipes
/// cannot be created, in which case nothing is started.
fn spawn_stages(commands: &[Command], batch_mode: bool) -> Result<Vec<Stage>> {
    let pipe_count = commands.len().saturating_sub(1);
    let pipes = (0..pipe_count)
        .map(|_| stdio::create_pipe())
        .collect::<Result<Vec<_>>>()?;
    let (mut read_ends, mut write_ends): (Vec<Option<File>>, Vec<Option<File>>) = pipes
        .into_iter()
        .map(|(read_end, write_end)| (Some(read_end), Some(write_end)))
        .unzip();

    let mut stages = Vec::with_capacity(commands.len());
    for (i, command) in commands.iter().enumerate() {
        let pipe_in = if i > 0 { read_ends[i - 1].take() } else { None };
        let pipe_out = write_ends.get_mut(i).and_then(Option::take);
        let unused: Vec<RawFd> = read_ends
            .iter()
            .chain(write_ends.iter())
            .filter_map(|end| end.as_ref().map(AsRawFd::as_raw_fd))
            .collect();

        let stage = match start_stage(command, pipe_in, pipe_out, &unused, batch_mode) {
            Ok(stage) => stage,
            Err(e) => {
                errors::report(&e);
                Stage::Finished(ExitStatus::from_failure())
            }
        };
        debug!("stage {} ({:?}) started as {:?}", i, command.argv, stage.id());
        stages.push(stage);
    }

    // Any ends still held belong to stages that never started.
    drop(read_ends);
    drop(write_ends);
    Ok(stages)
}

/// Starts one stage. Its pipe ends are consumed here, so the shell's copies
/// are closed as soon as the stage has been started.
fn start_stage(
    command: &Command,
    pipe_in: Option<File>,
    pipe_out: Option<File>,
    unused: &[RawFd],
    batch_mode: bool,
) -> Result<Stage> {
    let program = match command.program() {
        Some(program) => program,
        None => return Ok(Stage::Finished(ExitStatus::from_success())),
    };

    let stdin = Stdin::new(command.infile.as_deref(), pipe_in, batch_mode)?;
    let stdout = Output::new(command.outfile.as_deref(), pipe_out)?;

    if builtins::is_builtin(program) {
        fork_builtin(command, stdin, stdout, unused).map(Stage::Forked)
    } else {
        let path =
            resolver::find_program(program).ok_or_else(|| Error::command_not_found(program))?;
        spawn_external(&path, &command.argv, stdin, stdout).map(Stage::External)
    }
}

/// Runs a builtin in a child process so that it cannot change the shell's
/// working directory or end the shell.
fn fork_builtin(
    command: &Command,
    stdin: Stdin,
    stdout: Output,
    unused: &[RawFd],
) -> Result<Pid> {
    // Anything still buffered would otherwise be written twice.
    io::stdout().flush()?;

    match unsafe { unistd::fork() }.chain_err(|| ErrorKind::Exec(command.argv[0].clone()))? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            let code = run_forked_builtin(command, &stdin, &stdout, unused);
            process::exit(code)
        }
    }
}

/// Body of a forked builtin stage. Returns the child's exit code.
fn run_forked_builtin(
    command: &Command,
    stdin: &Stdin,
    stdout: &Output,
    unused: &[RawFd],
) -> i32 {
    let wiring = [
        (stdin.as_raw_fd(), libc::STDIN_FILENO),
        (stdout.as_raw_fd(), libc::STDOUT_FILENO),
    ];
    for &(fd, target) in &wiring {
        if fd != target && unistd::dup2(fd, target).is_err() {
            eprintln!("mysh: failed to set up pipeline stage");
            return 1;
        }
    }
    for &(fd, target) in &wiring {
        if fd != target {
            let _ = unistd::close(fd);
        }
    }
    for &fd in unused {
        let _ = unistd::close(fd);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let (status, _) = builtins::run(&command.argv[0], command.args(), &mut handle);
    status.code().unwrap_or(1)
}

fn wait_for_process(pid: Pid) -> Result<ExitStatus> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus::from_status(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                use std::os::unix::process::ExitStatusExt;
                return Ok(ExitStatus::from_raw(signal as i32));
            }
            Ok(_) | Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reaps every stage in order, returning each stage's pid (if it had one)
/// and shell status.
fn wait_for_stages(stages: Vec<Stage>) -> Vec<(Option<Pid>, ExitStatus)> {
    stages
        .into_iter()
        .map(|stage| {
            let id = stage.id();
            let status = match stage.wait() {
                Ok(status) => shell_status(status),
                Err(e) => {
                    warn!("failed to reap {:?}: {}", id, e);
                    ExitStatus::from_failure()
                }
            };
            debug!("stage {:?} finished with {}", id, status);
            (id, status)
        })
        .collect()
}
