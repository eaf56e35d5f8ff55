//! Standard stream bindings for spawned programs and for builtins that run in
//! the shell process.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::process::Stdio;

use log::{debug, warn};
use nix::fcntl::OFlag;
use nix::libc;
use nix::unistd;

use crate::errors::{ErrorKind, Result, ResultExt};
use crate::parser::Command;
use crate::util;

/// Permissions for files created by `>`: owner and group may read and write.
const OUTPUT_FILE_MODE: u32 = 0o660;

const NULL_DEVICE: &str = "/dev/null";

#[derive(Debug)]
pub enum Stdin {
    Inherit,
    File(File),
}

#[derive(Debug)]
pub enum Output {
    Inherit,
    File(File),
}

impl Stdin {
    /// File redirects take precedence over pipes, following bash's behavior.
    /// With neither, a batch-mode shell whose own stdin is not a terminal
    /// gives the program the null device so it cannot consume the script.
    pub fn new(redirect: Option<&str>, pipe: Option<File>, batch_mode: bool) -> Result<Self> {
        match (redirect, pipe) {
            (Some(path), _) => open_input(path).map(Stdin::File),
            (None, Some(pipe)) => Ok(Stdin::File(pipe)),
            (None, None) if batch_mode && !util::isatty(libc::STDIN_FILENO) => {
                Ok(null_input())
            }
            (None, None) => Ok(Stdin::Inherit),
        }
    }
}

impl Output {
    /// File redirects take precedence over pipes, following bash's behavior.
    pub fn new(redirect: Option<&str>, pipe: Option<File>) -> Result<Self> {
        match (redirect, pipe) {
            (Some(path), _) => open_output(path).map(Output::File),
            (None, Some(pipe)) => Ok(Output::File(pipe)),
            (None, None) => Ok(Output::Inherit),
        }
    }
}

impl AsRawFd for Stdin {
    fn as_raw_fd(&self) -> RawFd {
        match self {
            Stdin::Inherit => libc::STDIN_FILENO,
            Stdin::File(f) => f.as_raw_fd(),
        }
    }
}

impl AsRawFd for Output {
    fn as_raw_fd(&self) -> RawFd {
        match self {
            Output::Inherit => libc::STDOUT_FILENO,
            Output::File(f) => f.as_raw_fd(),
        }
    }
}

impl From<Stdin> for Stdio {
    fn from(stdin: Stdin) -> Self {
        match stdin {
            Stdin::Inherit => Self::inherit(),
            Stdin::File(file) => file.into(),
        }
    }
}

impl From<Output> for Stdio {
    fn from(stdout: Output) -> Self {
        match stdout {
            Output::Inherit => Self::inherit(),
            Output::File(file) => file.into(),
        }
    }
}

pub fn open_input(path: &str) -> Result<File> {
    File::open(path).chain_err(|| ErrorKind::Redirect(path.to_string()))
}

/// Opens `path` for writing, creating it if absent and truncating it if present.
pub fn open_output(path: &str) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_FILE_MODE)
        .open(path)
        .chain_err(|| ErrorKind::Redirect(path.to_string()))
}

/// Falls back to the inherited stdin if the null device cannot be opened.
fn null_input() -> Stdin {
    match File::open(NULL_DEVICE) {
        Ok(file) => Stdin::File(file),
        Err(e) => {
            warn!("failed to open {}: {}", NULL_DEVICE, e);
            Stdin::Inherit
        }
    }
}

/// Wraps `unistd::pipe2()` to return RAII structs instead of raw, owning file descriptors
/// Returns (`read_end_pipe`, `write_end_pipe`)
pub fn create_pipe() -> Result<(File, File)> {
    // IMPORTANT: immediately pass the RawFds returned by pipe2() into RAII
    // structs (File) so they cannot leak. Both ends are close-on-exec, so a
    // spawned program only keeps the end it was handed as stdin or stdout.
    let (read_end_pipe, write_end_pipe) = unistd::pipe2(OFlag::O_CLOEXEC)?;
    unsafe {
        Ok((
            File::from_raw_fd(read_end_pipe),
            File::from_raw_fd(write_end_pipe),
        ))
    }
}

/// Temporarily points the shell's own stdin/stdout at a command's redirection
/// targets. The original descriptors are restored when this is dropped.
#[derive(Debug)]
pub struct Redirection {
    saved_stdin: Option<RawFd>,
    saved_stdout: Option<RawFd>,
}

impl Redirection {
    /// Both targets are opened before any descriptor is touched, so a failure
    /// leaves the shell's stdin and stdout as they were.
    pub fn install(command: &Command) -> Result<Redirection> {
        let input = command.infile.as_deref().map(open_input).transpose()?;
        let output = command.outfile.as_deref().map(open_output).transpose()?;

        let mut redirection = Redirection {
            saved_stdin: None,
            saved_stdout: None,
        };
        if let Some(file) = input {
            redirection.saved_stdin = Some(replace_fd(&file, libc::STDIN_FILENO)?);
        }
        if let Some(file) = output {
            io::stdout().flush()?;
            redirection.saved_stdout = Some(replace_fd(&file, libc::STDOUT_FILENO)?);
        }

        Ok(redirection)
    }
}

/// Duplicates `target` for later restoration, then makes `target` refer to `file`.
fn replace_fd(file: &File, target: RawFd) -> Result<RawFd> {
    let saved = unistd::dup(target)?;
    if let Err(e) = unistd::dup2(file.as_raw_fd(), target) {
        log_if_err!(unistd::close(saved), "close({})", saved);
        return Err(e.into());
    }
    debug!("fd {} redirected (saved as {})", target, saved);
    Ok(saved)
}

fn restore_fd(saved: Option<RawFd>, target: RawFd) {
    if let Some(saved) = saved {
        log_if_err!(unistd::dup2(saved, target), "restore fd {}", target);
        log_if_err!(unistd::close(saved), "close({})", saved);
    }
}

impl Drop for Redirection {
    fn drop(&mut self) {
        if self.saved_stdout.is_some() {
            log_if_err!(io::stdout().flush(), "flush redirected stdout");
        }
        restore_fd(self.saved_stdin.take(), libc::STDIN_FILENO);
        restore_fd(self.saved_stdout.take(), libc::STDOUT_FILENO);
    }
}
