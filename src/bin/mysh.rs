use std::fs::File;
use std::io::{self, BufReader};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use log::{debug, error};
use mysh_rs::errors::Result;
use mysh_rs::util::isatty;
use mysh_rs::{editor::Editor, ExitRequest, Shell, ShellConfig};
use nix::libc;
use nix::unistd::Pid;
use serde_derive::Deserialize;

const LOG_FILE_NAME: &str = ".mysh_log";

const USAGE: &str = "
mysh.

With -c, runs the single line <command> and exits with its status.

Usage:
    mysh [options] [<file>]
    mysh [options] -c <command>
    mysh (-h | --help)
    mysh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    --log=<path>    File to write log to, defaults to ~/.mysh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    arg_file: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(args.flag_log.as_ref());
    debug!("{:?}", args);

    if args.flag_version {
        println!("mysh version {}", env!("CARGO_PKG_VERSION"));
    } else if args.flag_c {
        execute_from_command_string(args.arg_command.as_deref().unwrap_or(""));
    } else if let Some(ref path) = args.arg_file {
        execute_from_file(path);
    } else {
        execute_from_stdin();
    }
}

/// Logs go to a file only, so they never interleave with job output. A log
/// file that cannot be opened leaves the shell running without a logger.
fn init_logger(path: Option<&String>) {
    let log_path = match path.map(PathBuf::from).or_else(default_log_path) {
        Some(log_path) => log_path,
        None => {
            eprintln!("mysh: cannot locate home directory, logging disabled");
            return;
        }
    };

    let log_file = match fern::log_file(&log_path) {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!("mysh: {}: {}, logging disabled", log_path.display(), e);
            return;
        }
    };

    let pid = Pid::this();
    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(log_file)
        .apply();
    if let Err(e) = result {
        eprintln!("mysh: failed to install logger: {}", e);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

/// Runs one line in batch mode and exits with its status, unless the line
/// itself asked to exit.
fn execute_from_command_string(command: &str) -> ! {
    let mut shell = Shell::new(ShellConfig::noninteractive());
    match shell.execute_command_string(command) {
        ExitRequest::Continue => {
            let code = shell.last_exit_status().code().unwrap_or(1);
            debug!("command string finished with status {}", code);
            process::exit(code);
        }
        request => shell.exit(request),
    }
}

fn execute_from_file(path: &str) -> ! {
    let file = File::open(path).unwrap_or_else(|e| {
        error!("failed to open {}: {}", path, e);
        eprintln!("mysh: {}: {}", path, e);
        process::exit(1);
    });

    let config = if isatty(file.as_raw_fd()) {
        ShellConfig::interactive()
    } else {
        ShellConfig::noninteractive()
    };
    let mut shell = Shell::new(config);
    let result = shell.execute_commands_from_reader(BufReader::new(file));
    exit(result, &shell);
}

fn execute_from_stdin() -> ! {
    if isatty(libc::STDIN_FILENO) {
        let mut shell = Shell::new(ShellConfig::interactive());
        let mut editor = Editor::new();
        let result = shell.execute_from_editor(&mut editor);
        exit(result, &shell);
    }

    let mut shell = Shell::new(ShellConfig::noninteractive());
    let stdin = io::stdin();
    let result = shell.execute_commands_from_reader(stdin.lock());
    exit(result, &shell);
}

fn exit(result: Result<ExitRequest>, shell: &Shell) -> ! {
    match result {
        Ok(request) => shell.exit(request),
        Err(e) => {
            error!("failed to read input: {}", e);
            eprintln!("mysh: {}", e);
            shell.exit(ExitRequest::Failure);
        }
    }
}
