//! Splitting of a raw input line into a command name and its arguments.

/// A command line broken into words.
///
/// `name` is empty for blank input, which the registry maps to a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// True when the line held no words at all.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.args.is_empty()
    }
}

/// Split `line` on runs of whitespace.
///
/// The first word becomes the command name and the rest its arguments, in order.
/// Empty input, input starting with a newline and input made only of whitespace all
/// yield a blank command. There is no quoting or escaping: every byte that is not
/// whitespace belongs to some word.
pub fn parse(line: &str) -> ParsedCommand {
    if line.is_empty() || line.starts_with('\n') {
        return ParsedCommand::default();
    }

    let mut words = line.split_whitespace().map(str::to_owned);
    match words.next() {
        Some(name) => ParsedCommand::new(name, words.collect()),
        None => ParsedCommand::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_name_and_args() {
        let parsed = parse("echo a b c");
        assert_eq!(parsed.name, "echo");
        assert_eq!(parsed.args, words(&["a", "b", "c"]));
    }

    #[test]
    fn test_parse_empty_and_newline_leading_input() {
        assert!(parse("").is_blank());
        assert!(parse("\n").is_blank());
        assert!(parse("\necho ignored").is_blank());
    }

    #[test]
    fn test_parse_whitespace_only_is_blank() {
        assert!(parse("   ").is_blank());
        assert!(parse(" \t  \r\n").is_blank());
    }

    #[test]
    fn test_parse_collapses_runs_of_whitespace() {
        let parsed = parse("  ls \t -l    /tmp  \n");
        assert_eq!(parsed, ParsedCommand::new("ls", words(&["-l", "/tmp"])));
    }

    #[test]
    fn test_parse_keeps_quotes_literally() {
        let parsed = parse("echo \"hello world\" 'x'");
        assert_eq!(parsed.args, words(&["\"hello", "world\"", "'x'"]));
    }

    #[test]
    fn test_parse_command_without_args() {
        let parsed = parse("pwd");
        assert_eq!(parsed.name, "pwd");
        assert!(parsed.args.is_empty());
        assert!(!parsed.is_blank());
    }
}
