//! Mysh - a minimal line-oriented command shell
//!
//! A line is parsed into a [`Job`](parser::Job): a pipeline of commands with
//! optional file redirection and an optional `and`/`or` gate on the status of
//! the previous line. [`execute_job`](execute_command::execute_job) runs it by
//! spawning processes, wiring pipes, and reporting a 0/1 shell status.

#![deny(
    missing_debug_implementations,
    unused_import_braces
)]
#![warn(trivial_casts, trivial_numeric_casts)]

#[macro_use]
extern crate error_chain;

#[macro_use]
pub mod util;

pub mod builtins;
pub mod editor;
pub mod errors;
pub mod execute_command;
pub mod parser;
pub mod resolver;
pub mod shell;

pub use crate::execute_command::{execute_job, ExitRequest};
pub use crate::parser::{Command, Conditional, Job};
pub use crate::shell::{Shell, ShellConfig};
pub use crate::util::MyshExitStatusExt;
