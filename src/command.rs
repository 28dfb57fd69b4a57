use crate::builtin::Registry;
use crate::env::Environment;
use crate::external::Launcher;
use anyhow::Result;
use std::io::Write;

/// Result of dispatching one input line.
///
/// Produced fresh by every dispatch and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran (or an external program was launched).
    Success,
    /// The command reported an error; the shell keeps going.
    Failure,
    /// Neither a builtin nor an executable on PATH.
    Unrecognized,
    /// `exit` was requested with this status. The REPL driver ends the process.
    Terminate(i32),
}

impl Outcome {
    /// Status used when a single line is run non-interactively.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure => 1,
            Outcome::Unrecognized => 127,
            Outcome::Terminate(code) => code,
        }
    }
}

/// Everything a command may touch while it runs.
pub struct Context<'a> {
    /// Working directory and variables; `cd` mutates it.
    pub env: &'a mut Environment,
    /// The registry the command was dispatched from; `type` consults it.
    pub builtins: &'a Registry,
    /// Starts external programs.
    pub launcher: &'a mut dyn Launcher,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command, writing its responses to `stdout`.
    ///
    /// An `Err` is reserved for conditions the shell cannot continue after (missing
    /// `PATH`, a broken stdout); user mistakes come back as [`Outcome::Failure`].
    fn execute(self: Box<Self>, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome>;
}

/// Builds a command of one fixed name from its arguments.
pub trait CommandFactory {
    /// Name the command is registered under.
    fn name(&self) -> &'static str;

    /// Create a command instance for the provided arguments.
    ///
    /// Invalid arguments still produce a command: one that reports the problem.
    fn create(&self, args: &[String]) -> Box<dyn ExecutableCommand>;
}

#[cfg(test)]
mod tests {
    use super::Outcome;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::Failure.exit_code(), 1);
        assert_eq!(Outcome::Unrecognized.exit_code(), 127);
        assert_eq!(Outcome::Terminate(42).exit_code(), 42);
    }
}
