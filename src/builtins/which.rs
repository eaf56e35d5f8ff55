use crate::builtins::{self, prelude::*, BuiltinCommand};
use crate::resolver;

#[derive(Debug)]
pub struct Which;

impl BuiltinCommand for Which {
    const NAME: &'static str = "which";

    /// Fails without a message for builtins and unresolvable names.
    fn run<T: AsRef<str>>(args: &[T], stdout: &mut dyn Write) -> Result<ExitRequest> {
        let name = match args {
            [name] => name.as_ref(),
            _ => return Err(Error::silent_failure()),
        };

        if builtins::is_builtin(name) {
            return Err(Error::silent_failure());
        }

        let path = resolver::find_program(name).ok_or_else(Error::silent_failure)?;
        writeln!(stdout, "{}", path.display())?;
        Ok(ExitRequest::Continue)
    }
}
