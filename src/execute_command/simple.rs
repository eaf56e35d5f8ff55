//! Runs jobs made of a single command.

use std::io;
use std::process::ExitStatus;

use log::debug;

use super::stdio::{Output, Redirection, Stdin};
use super::{shell_status, spawn_external, ExitRequest};
use crate::builtins;
use crate::errors::{self, Error, Result, ResultExt};
use crate::parser::Command;
use crate::resolver;
use crate::util::MyshExitStatusExt;

/// Runs `command` and waits for it. A command without words leaves
/// `last_status` unchanged.
pub fn run_simple_command(
    command: &Command,
    last_status: ExitStatus,
    batch_mode: bool,
) -> (ExitStatus, ExitRequest) {
    let program = match command.program() {
        Some(program) => program,
        None => return (last_status, ExitRequest::Continue),
    };

    if builtins::is_builtin(program) {
        return run_builtin_command(program, command);
    }

    match run_external_command(program, command, batch_mode) {
        Ok(status) => (status, ExitRequest::Continue),
        Err(e) => {
            errors::report(&e);
            (ExitStatus::from_failure(), ExitRequest::Continue)
        }
    }
}

/// Builtins run in the shell process, so the shell's own stdin/stdout are
/// redirected around the call and restored afterwards.
fn run_builtin_command(program: &str, command: &Command) -> (ExitStatus, ExitRequest) {
    let _redirection = match Redirection::install(command) {
        Ok(redirection) => redirection,
        Err(e) => {
            errors::report(&e);
            return (ExitStatus::from_failure(), ExitRequest::Continue);
        }
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    builtins::run(program, command.args(), &mut handle)
}

fn run_external_command(
    program: &str,
    command: &Command,
    batch_mode: bool,
) -> Result<ExitStatus> {
    let path =
        resolver::find_program(program).ok_or_else(|| Error::command_not_found(program))?;
    let stdin = Stdin::new(command.infile.as_deref(), None, batch_mode)?;
    let stdout = Output::new(command.outfile.as_deref(), None)?;

    let mut child = spawn_external(&path, &command.argv, stdin, stdout)?;
    let status = child.wait().chain_err(|| "failed to wait for child")?;
    debug!("{} ({}) exited with {}", program, child.id(), status);
    Ok(shell_status(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempdir::TempDir;

    fn command(argv: &[&str]) -> Command {
        Command {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn run(command: &Command) -> ExitStatus {
        let (status, request) = run_simple_command(command, ExitStatus::from_success(), true);
        assert_eq!(request, ExitRequest::Continue);
        status
    }

    #[test]
    fn test_empty_command_keeps_status() {
        let (status, request) =
            run_simple_command(&Command::new(), ExitStatus::from_failure(), true);
        assert_eq!(status.code(), Some(1));
        assert_eq!(request, ExitRequest::Continue);

        let (status, _) = run_simple_command(&Command::new(), ExitStatus::from_success(), true);
        assert!(status.success());
    }

    #[test]
    fn test_external_status() {
        assert!(run(&command(&["true"])).success());
        assert_eq!(run(&command(&["false"])).code(), Some(1));
        assert_eq!(run(&command(&["sh", "-c", "exit 7"])).code(), Some(1));
    }

    #[test]
    fn test_signal_counts_as_failure() {
        assert_eq!(run(&command(&["sh", "-c", "kill -9 $$"])).code(), Some(1));
    }

    #[test]
    fn test_command_not_found() {
        assert_eq!(run(&command(&["mysh-test-no-such-program"])).code(), Some(1));
        assert_eq!(run(&command(&["/mysh/test/no/such/program"])).code(), Some(1));
    }

    #[test]
    fn test_output_redirect_truncates() {
        let dir = TempDir::new("simple").unwrap();
        let out = dir.path().join("out.txt");
        let out_str = out.to_str().unwrap().to_string();

        let mut first = command(&["echo", "first", "and", "longer"]);
        first.outfile = Some(out_str.clone());
        assert!(run(&first).success());

        let mut second = command(&["echo", "second"]);
        second.outfile = Some(out_str);
        assert!(run(&second).success());

        assert_eq!(fs::read_to_string(&out).unwrap(), "second\n");
    }

    #[test]
    fn test_input_and_output_redirect() {
        let dir = TempDir::new("simple").unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "b\na\nc\n").unwrap();

        let mut sort = command(&["sort"]);
        sort.infile = Some(input.to_str().unwrap().into());
        sort.outfile = Some(output.to_str().unwrap().into());
        assert!(run(&sort).success());
        assert_eq!(fs::read_to_string(&output).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn test_missing_input_file_does_not_run_command() {
        let dir = TempDir::new("simple").unwrap();
        let output = dir.path().join("out.txt");

        let mut cat = command(&["cat"]);
        cat.infile = Some(dir.path().join("missing").to_str().unwrap().into());
        cat.outfile = Some(output.to_str().unwrap().into());
        assert_eq!(run(&cat).code(), Some(1));
        assert!(!output.exists());
    }

    #[test]
    fn test_arguments_are_passed_verbatim() {
        let dir = TempDir::new("simple").unwrap();
        let output = dir.path().join("out.txt");

        let mut sh = command(&["sh", "-c", "echo $0 $#", "zeroth", "one"]);
        sh.outfile = Some(output.to_str().unwrap().into());
        assert!(run(&sh).success());
        assert_eq!(fs::read_to_string(&output).unwrap(), "zeroth 1\n");
    }

    #[test]
    fn test_batch_mode_child_reads_nothing() {
        let dir = TempDir::new("simple").unwrap();
        let output = dir.path().join("out.txt");

        let mut wc = command(&["wc", "-c"]);
        wc.outfile = Some(output.to_str().unwrap().into());
        assert!(run(&wc).success());
        if !crate::util::isatty(nix::libc::STDIN_FILENO) {
            assert_eq!(fs::read_to_string(&output).unwrap().trim(), "0");
        }
    }
}
