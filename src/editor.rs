//! Line editing for interactive sessions.

use std::fmt;

use rustyline::{self, error::ReadlineError};

use crate::errors::Result;

pub struct Editor {
    internal: rustyline::Editor<()>,
}

impl Editor {
    pub fn new() -> Editor {
        Editor {
            internal: rustyline::Editor::<()>::new(),
        }
    }

    /// Returns `None` when end of file is reached. An interrupted line (Ctrl-C)
    /// is returned as an empty line.
    pub fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.internal.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.internal.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Editor {{ history: {} entries }}", self.internal.history().len())
    }
}
