use rustyline::error::ReadlineError;

/// Errors that stop the shell instead of failing a single command.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    /// Command resolution is impossible without a search path.
    #[error("PATH environment variable is not set")]
    PathUnset,
    #[error("readline: {0}")]
    Readline(#[from] ReadlineError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected builtin arguments. Reported to the user, the shell keeps running.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("ArgumentError: {command} takes exactly 1 argument")]
    WrongArity { command: &'static str },
    #[error("ArgumentError: {command} expects an integer argument, got '{value}'")]
    NotAnInteger {
        command: &'static str,
        value: String,
    },
}

pub type ShellResult<T> = Result<T, ShellError>;
