//! Mysh - Shell Module
//!
//! The Shell reads lines, runs each one as a job, and threads the status of
//! the previous job into the next.

use std::io::{self, BufRead, Write};
use std::process::{self, ExitStatus};

use log::{debug, info};

use crate::editor::Editor;
use crate::errors::Result;
use crate::execute_command::{execute_job, ExitRequest};
use crate::parser::Job;
use crate::util::MyshExitStatusExt;

const BANNER: &str = "Welcome to my shell!";
const PROMPT: &str = "mysh> ";
const EXIT_MESSAGE: &str = "mysh: exiting";

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Determines if input comes from a user. Otherwise jobs run in batch
    /// mode: the first program of a job gets an empty stdin unless the
    /// shell's own stdin is a terminal.
    interactive: bool,

    /// Determines if the banner, prompt, and exit message are displayed.
    display_messages: bool,
}

impl ShellConfig {
    /// Creates an interactive shell: prompts and messages are displayed, and
    /// programs share the shell's stdin.
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            display_messages: true,
        }
    }

    /// Creates a noninteractive shell, e.g. for running a script
    pub fn noninteractive() -> Self {
        Default::default()
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            interactive: false,
            display_messages: false,
        }
    }
}

/// Mysh Shell
#[derive(Debug)]
pub struct Shell {
    config: ShellConfig,
    /// Exit status of last job executed.
    last_exit_status: ExitStatus,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Shell {
        info!("mysh started up with {:?}", config);
        Shell {
            config,
            last_exit_status: ExitStatus::from_success(),
        }
    }

    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    /// Parses and runs one line.
    pub fn execute_command_string(&mut self, input: &str) -> ExitRequest {
        let job = Job::parse(input);
        let batch_mode = !self.config.interactive;
        let (status, request) = execute_job(&job, self.last_exit_status, batch_mode);
        debug!("'{}' finished with {} ({:?})", job.input, status, request);
        self.last_exit_status = status;
        request
    }

    /// Runs every line of `reader` until end of input or until a job asks
    /// the shell to exit. A last line without a newline still runs.
    pub fn execute_commands_from_reader<R: BufRead>(
        &mut self,
        mut reader: R,
    ) -> Result<ExitRequest> {
        self.greet();
        let mut buffer = Vec::new();
        loop {
            self.prompt()?;
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                return Ok(ExitRequest::Continue);
            }

            let line = String::from_utf8_lossy(&buffer);
            let request = self.execute_command_string(&line);
            if request != ExitRequest::Continue {
                return Ok(request);
            }
        }
    }

    /// Runs lines read from an interactive line editor.
    pub fn execute_from_editor(&mut self, editor: &mut Editor) -> Result<ExitRequest> {
        self.greet();
        let prompt = if self.config.display_messages { PROMPT } else { "" };
        while let Some(line) = editor.readline(prompt)? {
            let request = self.execute_command_string(&line);
            if request != ExitRequest::Continue {
                return Ok(request);
            }
        }

        Ok(ExitRequest::Continue)
    }

    /// Terminates the process. `ExitRequest::Failure` exits with status 1;
    /// anything else (including end of input) exits with status 0.
    pub fn exit(&self, request: ExitRequest) -> ! {
        let code = match request {
            ExitRequest::Failure => 1,
            ExitRequest::Success | ExitRequest::Continue => {
                if self.config.display_messages {
                    println!("{}", EXIT_MESSAGE);
                }
                0
            }
        };

        info!("mysh has shut down with status {}", code);
        process::exit(code);
    }

    fn greet(&self) {
        if self.config.display_messages {
            println!("{}", BANNER);
        }
    }

    fn prompt(&self) -> Result<()> {
        if self.config.display_messages {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(PROMPT.as_bytes())?;
            handle.flush()?;
        }
        Ok(())
    }
}
