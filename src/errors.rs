//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

use log::warn;
use rustyline::error::ReadlineError;

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        Readline(ReadlineError);
    }

    errors {
        /// An external program could not be found in the search path
        CommandNotFound(name: String) {
            description("command not found")
            display("{}: command not found", name)
        }
        /// A builtin command failed with the given exit status. An empty
        /// message means the builtin fails silently.
        BuiltinCommand(message: String, code: i32) {
            description("builtin command failed")
            display("{}", message)
        }
        /// A redirection target could not be opened
        Redirect(path: String) {
            description("cannot open redirection target")
            display("{}", path)
        }
        /// A program image could not be started
        Exec(path: String) {
            description("cannot execute program")
            display("{}", path)
        }
    }
}

impl Error {
    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        ErrorKind::BuiltinCommand(message.as_ref().to_string(), code).into()
    }

    pub(crate) fn silent_failure() -> Error {
        ErrorKind::BuiltinCommand(String::new(), 1).into()
    }

    pub(crate) fn command_not_found<T: AsRef<str>>(command: T) -> Error {
        ErrorKind::CommandNotFound(command.as_ref().to_string()).into()
    }
}

/// Reports `error` on stderr the way the shell presents failures to the user,
/// e.g. `mysh: out.txt: Permission denied (os error 13)`.
pub fn report(error: &Error) {
    warn!("{}", error);
    match *error.kind() {
        ErrorKind::CommandNotFound(_) => eprintln!("{}", error),
        ErrorKind::BuiltinCommand(ref message, _) if message.is_empty() => {}
        _ => {
            let chain: Vec<String> = error.iter().map(|e| e.to_string()).collect();
            eprintln!("mysh: {}", chain.join(": "));
        }
    }
}
