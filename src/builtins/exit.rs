use crate::builtins::{prelude::*, BuiltinCommand};

#[derive(Debug)]
pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";

    fn run<T: AsRef<str>>(_args: &[T], _stdout: &mut dyn Write) -> Result<ExitRequest> {
        Ok(ExitRequest::Success)
    }
}

/// `die [WORD ...]`: print the words and terminate the shell with failure.
#[derive(Debug)]
pub struct Die;

impl BuiltinCommand for Die {
    const NAME: &'static str = "die";

    fn run<T: AsRef<str>>(args: &[T], stdout: &mut dyn Write) -> Result<ExitRequest> {
        if !args.is_empty() {
            let message: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
            writeln!(stdout, "{}", message.join(" "))?;
        }
        Ok(ExitRequest::Failure)
    }
}
