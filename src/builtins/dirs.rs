use std::env;

use crate::builtins::{prelude::*, BuiltinCommand};

#[derive(Debug)]
pub struct Cd;

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";

    fn run<T: AsRef<str>>(args: &[T], _stdout: &mut dyn Write) -> Result<ExitRequest> {
        let dir = match args {
            [dir] => dir.as_ref(),
            _ => return Err(Error::builtin_command("cd: wrong number of arguments", 1)),
        };

        env::set_current_dir(dir)
            .chain_err(|| ErrorKind::BuiltinCommand(format!("cd: {}", dir), 1))?;
        Ok(ExitRequest::Continue)
    }
}

#[derive(Debug)]
pub struct Pwd;

impl BuiltinCommand for Pwd {
    const NAME: &'static str = "pwd";

    fn run<T: AsRef<str>>(_args: &[T], stdout: &mut dyn Write) -> Result<ExitRequest> {
        let cwd = env::current_dir().chain_err(|| ErrorKind::BuiltinCommand("pwd".into(), 1))?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(ExitRequest::Continue)
    }
}
