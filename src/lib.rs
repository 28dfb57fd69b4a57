//! A minimal interactive command shell.
//!
//! A line of input is split into a command name and its arguments. The name is looked
//! up in a fixed registry of builtins first (`echo`, `type`, `pwd`, `cd`, `exit`, `okay`
//! and the blank no-op); anything else is searched for in the directories listed in
//! `PATH` and launched as an external program.
//!
//! The main entry point is [`Interpreter`], which owns the builtin [`Registry`], the
//! shell [`Environment`] and the [`Launcher`] used for external programs. The
//! [`command`] module exposes the [`Outcome`] of a dispatch and the traits used to
//! implement commands.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
mod parser;
#[cfg(test)]
mod test_support;

pub use builtin::Registry;
pub use command::Outcome;
pub use config::Config;
pub use env::Environment;
pub use error::{ArgumentError, ShellError};
pub use external::{Launcher, ProcessLauncher, find_in_path, resolve};
pub use interpreter::Interpreter;
pub use parser::{ParsedCommand, parse};
