use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{self, Command, Stdio};

use tempdir::TempDir;

/// WorkDir represents a scratch directory in which the shell binary is run.
#[derive(Debug)]
pub struct WorkDir {
    /// Removed when the WorkDir is dropped.
    dir: TempDir,
}

impl WorkDir {
    pub fn new(name: &str) -> WorkDir {
        WorkDir {
            dir: TempDir::new(&format!("mysh-{}", name)).expect("failed to create temp dir"),
        }
    }

    /// Canonical path of the directory, i.e. what `pwd` prints inside it.
    pub fn path(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("temp dir should exist")
    }

    /// Builds a command running the shell in this directory. Logs go to a
    /// file inside the directory rather than the user's home.
    pub fn command<I, S>(&self, args: I) -> process::Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mysh"));
        cmd.current_dir(self.dir.path());
        cmd.arg(format!("--log={}", self.dir.path().join("mysh.log").display()));
        cmd.args(args);
        cmd
    }

    pub fn create<P: AsRef<Path>>(&self, name: P, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("failed to write file");
    }

    pub fn read<P: AsRef<Path>>(&self, name: P) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("failed to read file")
    }

    /// Runs `script` as a script file, with stdin closed off.
    pub fn run_script(&self, script: &str) -> process::Output {
        self.create("script.mysh", script);
        let mut cmd = self.command(&["script.mysh"]);
        cmd.stdin(Stdio::null());
        cmd.output().expect("failed to run mysh")
    }

    /// Runs the shell with `input` fed through its (non-terminal) stdin.
    pub fn run_stdin(&self, input: &str) -> process::Output {
        let mut child = self
            .command(&[] as &[&str])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to run mysh");
        child
            .stdin
            .take()
            .expect("stdin should be piped")
            .write_all(input.as_bytes())
            .expect("failed to write to mysh");
        child.wait_with_output().expect("failed to wait for mysh")
    }
}

pub fn stdout(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
