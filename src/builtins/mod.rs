//! Mysh builtins
//!
//! Commands run inside the shell process itself: `cd`, `pwd`, `which`,
//! `exit`, and `die`. No external program of the same name is ever run in
//! their place.

use std::process::ExitStatus;

use self::prelude::*;
use crate::util::MyshExitStatusExt;

use self::dirs::{Cd, Pwd};
use self::exit::{Die, Exit};
use self::which::Which;

pub mod prelude {
    pub use std::io::Write;

    pub use crate::errors::{Error, ErrorKind, Result, ResultExt};
    pub use crate::execute_command::ExitRequest;
}

mod dirs;
mod exit;
mod which;

/// Represents a Mysh builtin command such as cd or pwd.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// Runs the command with the given arguments (program name excluded),
    /// writing normal output to `stdout`.
    fn run<T: AsRef<str>>(args: &[T], stdout: &mut dyn Write) -> Result<ExitRequest>;
}

/// # Examples
///
/// ```
/// use mysh_rs::builtins::is_builtin;
///
/// assert!(is_builtin("cd"));
/// assert!(!is_builtin("ls"));
/// ```
pub fn is_builtin<T: AsRef<str>>(program: T) -> bool {
    [Cd::NAME, Die::NAME, Exit::NAME, Pwd::NAME, Which::NAME].contains(&program.as_ref())
}

/// precondition: command is a builtin.
/// Returns (`exit_status`, `exit_request`); failures are reported on stderr.
pub fn run<S1, S2>(program: S1, args: &[S2], stdout: &mut dyn Write) -> (ExitStatus, ExitRequest)
where
    S1: AsRef<str>,
    S2: AsRef<str>,
{
    debug_assert!(is_builtin(&program));

    let result = match program.as_ref() {
        Cd::NAME => Cd::run(args, stdout),
        Die::NAME => Die::run(args, stdout),
        Exit::NAME => Exit::run(args, stdout),
        Pwd::NAME => Pwd::run(args, stdout),
        Which::NAME => Which::run(args, stdout),
        _ => unreachable!(),
    };
    let result = result.and_then(|request| {
        stdout.flush()?;
        Ok(request)
    });

    if let Err(ref e) = result {
        crate::errors::report(e);
    }

    let exit_status = get_builtin_exit_status(&result);
    (exit_status, result.unwrap_or(ExitRequest::Continue))
}

fn get_builtin_exit_status(result: &Result<ExitRequest>) -> ExitStatus {
    let status = match result {
        Ok(ExitRequest::Failure) => 1,
        Ok(_) => 0,
        Err(e) => match *e.kind() {
            ErrorKind::BuiltinCommand(_, code) => code,
            _ => 1,
        },
    };

    ExitStatus::from_status(status)
}
