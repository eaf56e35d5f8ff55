//! Mysh Parser
//!
//! Lines are split on spaces and tabs; `<`, `>`, `|`, and `#` always end a
//! word. There is no quoting or escaping. Parsing never fails: incomplete
//! directives such as a trailing `>` are dropped.

pub use self::ast::{Command, Conditional, Job};

mod ast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    /// `<`
    Less,
    /// `>`
    Great,
    /// `|`
    Pipe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Redirect {
    Input,
    Output,
}

fn is_separator(c: char) -> bool {
    match c {
        ' ' | '\t' | '\n' | '<' | '>' | '|' | '#' => true,
        _ => false,
    }
}

fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            // comments and anything after the first newline are ignored
            '#' | '\n' => break,
            '<' | '>' | '|' => {
                chars.next();
                tokens.push(match c {
                    '<' => Token::Less,
                    '>' => Token::Great,
                    _ => Token::Pipe,
                });
            }
            _ => {
                let mut end = line.len();
                while let Some(&(i, c)) = chars.peek() {
                    if is_separator(c) {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token::Word(&line[start..end]));
            }
        }
    }

    tokens
}

impl Job {
    /// Parse `input` according to mysh grammar
    ///
    /// # Examples
    ///
    /// ```
    /// use mysh_rs::parser::{Conditional, Job};
    ///
    /// let job = Job::parse("and cat < in.txt | sort > out.txt");
    /// assert_eq!(job.conditional, Conditional::And);
    /// assert_eq!(job.commands.len(), 2);
    /// assert_eq!(job.commands[0].argv, vec!["cat"]);
    /// assert_eq!(job.commands[0].infile, Some("in.txt".to_string()));
    /// assert_eq!(job.commands[1].outfile, Some("out.txt".to_string()));
    /// ```
    pub fn parse(input: &str) -> Job {
        let mut commands = Vec::new();
        let mut current = Command::new();
        let mut conditional = Conditional::Always;
        let mut pending_redirect = None;
        // only the first word of the line may be a keyword; operators before
        // it do not count as words, but a `|` ends the chance
        let mut keyword_allowed = true;

        for token in tokenize(input) {
            match token {
                Token::Less => pending_redirect = Some(Redirect::Input),
                Token::Great => pending_redirect = Some(Redirect::Output),
                Token::Pipe => {
                    // a redirect operator directly before `|` has no target
                    pending_redirect = None;
                    keyword_allowed = false;
                    commands.push(current);
                    current = Command::new();
                }
                Token::Word(word) => {
                    if keyword_allowed {
                        keyword_allowed = false;
                        if let Some(keyword) = Conditional::from_keyword(word) {
                            conditional = keyword;
                            continue;
                        }
                    }

                    match pending_redirect.take() {
                        Some(Redirect::Input) => current.infile = Some(word.to_string()),
                        Some(Redirect::Output) => current.outfile = Some(word.to_string()),
                        None => current.argv.push(word.to_string()),
                    }
                }
            }
        }
        commands.push(current);

        Job {
            input: input.trim_end_matches('\n').to_string(),
            commands,
            conditional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(argv: &[&str], infile: Option<&str>, outfile: Option<&str>) -> Command {
        Command {
            argv: argv.iter().map(|s| s.to_string()).collect(),
            infile: infile.map(String::from),
            outfile: outfile.map(String::from),
        }
    }

    fn single(argv: &[&str]) -> Vec<Command> {
        vec![command(argv, None, None)]
    }

    #[test]
    fn test_simple_command() {
        let job = Job::parse("echo bob");
        assert_eq!(job.commands, single(&["echo", "bob"]));
        assert_eq!(job.conditional, Conditional::Always);
        assert_eq!(job.input, "echo bob");
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(
            Job::parse(" \techo\t  a   b \t").commands,
            single(&["echo", "a", "b"])
        );
    }

    #[test]
    fn test_blank_lines_yield_one_empty_command() {
        for input in &["", "   ", "\t \t", "# just a comment", "   # indented", "\n"] {
            let job = Job::parse(input);
            assert_eq!(job.commands, vec![Command::new()], "input: {:?}", input);
            assert_eq!(job.conditional, Conditional::Always);
        }
    }

    #[test]
    fn test_comment_ends_line() {
        assert_eq!(Job::parse("echo a # b c").commands, single(&["echo", "a"]));
        assert_eq!(Job::parse("echo a#b").commands, single(&["echo", "a"]));
        assert_eq!(Job::parse("echo a # | cat").commands.len(), 1);
    }

    #[test]
    fn test_newline_ends_line() {
        let job = Job::parse("echo a\necho b");
        assert_eq!(job.commands, single(&["echo", "a"]));
        assert_eq!(job.input, "echo a\necho b");
        assert_eq!(Job::parse("echo a\n").input, "echo a");
    }

    #[test]
    fn test_infile() {
        let expected = vec![command(&["cat"], Some("in"), None)];
        assert_eq!(Job::parse("cat <in").commands, expected);
        assert_eq!(Job::parse("cat < in").commands, expected);
        assert_eq!(Job::parse("<in cat").commands, expected);
    }

    #[test]
    fn test_outfile() {
        let expected = vec![command(&["echo", "bob"], None, Some("out"))];
        assert_eq!(Job::parse("echo bob >out").commands, expected);
        assert_eq!(Job::parse("echo bob > out").commands, expected);
        assert_eq!(Job::parse("echo>out bob").commands, expected);
    }

    #[test]
    fn test_redirect() {
        assert_eq!(
            Job::parse(">out echo <in bob").commands,
            vec![command(&["echo", "bob"], Some("in"), Some("out"))]
        );
    }

    #[test]
    fn test_later_redirect_wins() {
        assert_eq!(
            Job::parse("cat <in1 <in2 >out1 >out2").commands,
            vec![command(&["cat"], Some("in2"), Some("out2"))]
        );
    }

    #[test]
    fn test_trailing_redirect_is_dropped() {
        assert_eq!(Job::parse("echo <").commands, single(&["echo"]));
        assert_eq!(Job::parse("echo >").commands, single(&["echo"]));
        assert_eq!(Job::parse(">").commands, vec![Command::new()]);
        assert_eq!(Job::parse("echo > # out").commands, single(&["echo"]));
    }

    #[test]
    fn test_redirect_before_pipe_is_dropped() {
        assert_eq!(
            Job::parse("echo > | cat").commands,
            vec![command(&["echo"], None, None), command(&["cat"], None, None)]
        );
    }

    #[test]
    fn test_repeated_operator_keeps_last() {
        assert_eq!(
            Job::parse("cat < > out").commands,
            vec![command(&["cat"], None, Some("out"))]
        );
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(
            Job::parse("<in cmd1 | cmd2 a|cmd3 >out").commands,
            vec![
                command(&["cmd1"], Some("in"), None),
                command(&["cmd2", "a"], None, None),
                command(&["cmd3"], None, Some("out")),
            ]
        );
    }

    #[test]
    fn test_empty_pipeline_stages() {
        assert_eq!(
            Job::parse("echo hi |").commands,
            vec![command(&["echo", "hi"], None, None), Command::new()]
        );
        assert_eq!(Job::parse("|").commands, vec![Command::new(), Command::new()]);
    }

    #[test]
    fn test_conditionals() {
        let job = Job::parse("and echo yes");
        assert_eq!(job.conditional, Conditional::And);
        assert_eq!(job.commands, single(&["echo", "yes"]));

        let job = Job::parse("  or echo no | cat");
        assert_eq!(job.conditional, Conditional::Or);
        assert_eq!(
            job.commands,
            vec![command(&["echo", "no"], None, None), command(&["cat"], None, None)]
        );
    }

    #[test]
    fn test_conditional_alone() {
        let job = Job::parse("or");
        assert_eq!(job.conditional, Conditional::Or);
        assert_eq!(job.commands, vec![Command::new()]);
    }

    #[test]
    fn test_keyword_after_leading_redirect() {
        // the pending `<` survives the keyword and takes the next word
        let job = Job::parse("< and cat");
        assert_eq!(job.conditional, Conditional::And);
        assert_eq!(job.commands, vec![command(&[], Some("cat"), None)]);

        let job = Job::parse("> or out echo hi");
        assert_eq!(job.conditional, Conditional::Or);
        assert_eq!(job.commands, vec![command(&["echo", "hi"], None, Some("out"))]);

        let job = Job::parse("> out or echo hi");
        assert_eq!(job.conditional, Conditional::Always);
        assert_eq!(job.commands, vec![command(&["or", "echo", "hi"], None, Some("out"))]);
    }

    #[test]
    fn test_keywords_elsewhere_are_words() {
        let job = Job::parse("echo and or");
        assert_eq!(job.conditional, Conditional::Always);
        assert_eq!(job.commands, single(&["echo", "and", "or"]));

        let job = Job::parse("echo | and");
        assert_eq!(job.conditional, Conditional::Always);
        assert_eq!(job.commands[1].argv, vec!["and"]);

        let job = Job::parse("and and");
        assert_eq!(job.conditional, Conditional::And);
        assert_eq!(job.commands, single(&["and"]));

        let job = Job::parse("| or cat");
        assert_eq!(job.conditional, Conditional::Always);
        assert_eq!(job.commands[1].argv, vec!["or", "cat"]);

        assert_eq!(Job::parse("AND x").conditional, Conditional::Always);
        assert_eq!(Job::parse("andx").commands, single(&["andx"]));
    }

    #[test]
    fn test_words_are_literal() {
        assert_eq!(
            Job::parse(r#"echo 'a b' "c" \d $HOME *.rs"#).commands,
            single(&["echo", "'a", "b'", "\"c\"", "\\d", "$HOME", "*.rs"])
        );
    }

    #[test]
    fn test_conditional_permits() {
        assert!(Conditional::Always.permits(true));
        assert!(Conditional::Always.permits(false));
        assert!(Conditional::And.permits(true));
        assert!(!Conditional::And.permits(false));
        assert!(!Conditional::Or.permits(true));
        assert!(Conditional::Or.permits(false));
    }

    #[test]
    fn test_command_accessors() {
        let cmd = command(&["ls", "-l", "/"], None, None);
        assert_eq!(cmd.program(), Some("ls"));
        assert_eq!(cmd.args(), &["-l".to_string(), "/".to_string()][..]);
        assert!(!cmd.is_empty());

        let empty = Command::new();
        assert_eq!(empty.program(), None);
        assert!(empty.args().is_empty());
        assert!(empty.is_empty());
    }
}
