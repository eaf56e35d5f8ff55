/// One program invocation within a job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    /// Program name followed by its arguments
    pub argv: Vec<String>,
    pub infile: Option<String>,
    pub outfile: Option<String>,
}

impl Command {
    pub fn new() -> Command {
        Default::default()
    }

    /// Returns `None` for a command with no words, e.g. a blank line.
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        if self.argv.is_empty() {
            &[]
        } else {
            &self.argv[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

/// Gate on the previous line's status, written as a leading `and` or `or`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conditional {
    Always,
    /// Run only if the previous job succeeded
    And,
    /// Run only if the previous job failed
    Or,
}

impl Conditional {
    pub(crate) fn from_keyword(word: &str) -> Option<Conditional> {
        match word {
            "and" => Some(Conditional::And),
            "or" => Some(Conditional::Or),
            _ => None,
        }
    }

    /// Returns `true` if a job with this gate should run after a job whose
    /// success is `previous_succeeded`.
    pub fn permits(self, previous_succeeded: bool) -> bool {
        match self {
            Conditional::Always => true,
            Conditional::And => previous_succeeded,
            Conditional::Or => !previous_succeeded,
        }
    }
}

impl Default for Conditional {
    fn default() -> Self {
        Conditional::Always
    }
}

/// Everything parsed from one input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    /// Command line, used for messages
    pub input: String,
    /// Pipeline stages, upstream first. Never empty.
    pub commands: Vec<Command>,
    pub conditional: Conditional,
}
