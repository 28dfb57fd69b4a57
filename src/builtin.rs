use crate::command::{CommandFactory, Context, ExecutableCommand, Outcome};
use crate::error::{ArgumentError, ShellError};
use crate::external::resolve;
use crate::interpreter::Factory;
use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins validate their own arguments and are executed directly in-process
/// without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Build the command from the words that followed its name.
    fn from_args(args: &[String]) -> Result<Self, ArgumentError>;

    /// Executes the command, writing its responses to `stdout`.
    ///
    /// An `Err` is shown to the user and turns into [`Outcome::Failure`], unless it is
    /// a [`ShellError`], which is fatal and propagates to the driver.
    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome> {
        match <T as BuiltinCommand>::execute(*self, stdout, ctx) {
            Ok(x) => Ok(x),
            Err(e) if e.is::<ShellError>() => Err(e),
            Err(e) => {
                writeln!(stdout, "{:#}", e)?;
                Ok(Outcome::Failure)
            }
        }
    }
}

struct InvalidArgs {
    error: ArgumentError,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<Outcome> {
        writeln!(stdout, "{}", self.error)?;
        Ok(Outcome::Failure)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn create(&self, args: &[String]) -> Box<dyn ExecutableCommand> {
        match T::from_args(args) {
            Ok(cmd) => Box::new(cmd),
            Err(error) => Box::new(InvalidArgs { error }),
        }
    }
}

fn single_arg(command: &'static str, args: &[String]) -> Result<String, ArgumentError> {
    match args {
        [arg] => Ok(arg.clone()),
        _ => Err(ArgumentError::WrongArity { command }),
    }
}

/// The fixed set of builtins, keyed by name.
///
/// Lookups are exact: no aliases, no prefixes. Only the constructor mutates it; the
/// interpreter holds it behind a shared reference afterwards.
pub struct Registry {
    entries: BTreeMap<&'static str, Box<dyn CommandFactory>>,
}

impl Registry {
    /// A registry without any builtins.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add `factory` under its name, returning the factory it replaced, if any.
    pub fn register(&mut self, factory: Box<dyn CommandFactory>) -> Option<Box<dyn CommandFactory>> {
        self.entries.insert(factory.name(), factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order. The blank no-op comes first as `""`.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Build the builtin called `name`, or `None` when there is no such builtin.
    pub fn create(&self, name: &str, args: &[String]) -> Option<Box<dyn ExecutableCommand>> {
        self.entries.get(name).map(|factory| factory.create(args))
    }
}

impl Default for Registry {
    /// All builtins: the blank no-op, `okay`, `exit`, `echo`, `type`, `pwd` and `cd`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Factory::<Blank>::default()));
        registry.register(Box::new(Factory::<Okay>::default()));
        registry.register(Box::new(Factory::<Exit>::default()));
        registry.register(Box::new(Factory::<Echo>::default()));
        registry.register(Box::new(Factory::<Type>::default()));
        registry.register(Box::new(Factory::<Pwd>::default()));
        registry.register(Box::new(Factory::<Cd>::default()));
        registry
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// What an empty line runs.
pub struct Blank;

impl BuiltinCommand for Blank {
    fn name() -> &'static str {
        ""
    }

    fn from_args(_args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Blank)
    }

    fn execute(self, _stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<Outcome> {
        Ok(Outcome::Success)
    }
}

/// Diagnostic command: confirms the shell is alive.
pub struct Okay;

impl BuiltinCommand for Okay {
    fn name() -> &'static str {
        "okay"
    }

    fn from_args(_args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Okay)
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<Outcome> {
        writeln!(stdout, "All okay!")?;
        Ok(Outcome::Success)
    }
}

/// Exit shell process with the given status.
pub struct Exit {
    pub code: i32,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[String]) -> Result<Self, ArgumentError> {
        let value = single_arg(Self::name(), args)?;
        match value.parse() {
            Ok(code) => Ok(Exit { code }),
            Err(_) => Err(ArgumentError::NotAnInteger {
                command: Self::name(),
                value,
            }),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<Outcome> {
        Ok(Outcome::Terminate(self.code))
    }
}

/// Write the arguments to standard output, separated by spaces, followed by a newline.
pub struct Echo {
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn from_args(args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Echo {
            args: args.to_vec(),
        })
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &mut Context<'_>) -> Result<Outcome> {
        writeln!(stdout, "{}", self.args.join(" "))?;
        Ok(Outcome::Success)
    }
}

/// Tell whether a name is a builtin, a program on PATH, or unknown.
pub struct Type {
    pub target: String,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn from_args(args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Type {
            target: single_arg(Self::name(), args)?,
        })
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome> {
        if ctx.builtins.contains(&self.target) {
            writeln!(stdout, "{} is a shell builtin", self.target)?;
        } else {
            match resolve(ctx.env, &self.target)? {
                Some(path) => writeln!(stdout, "{} is {}", self.target, path.display())?,
                None => writeln!(stdout, "{}: not found", self.target)?,
            }
        }
        // "not found" is an answer, not an error
        Ok(Outcome::Success)
    }
}

/// Print the current working directory to standard output.
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn from_args(_args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Pwd)
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome> {
        writeln!(stdout, "{}", ctx.env.current_dir.to_string_lossy())?;
        Ok(Outcome::Success)
    }
}

/// Change the current working directory.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn from_args(args: &[String]) -> Result<Self, ArgumentError> {
        Ok(Cd {
            target: single_arg(Self::name(), args)?,
        })
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome> {
        let target = PathBuf::from(&self.target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            ctx.env.current_dir.join(target)
        };

        if !new_dir.exists() {
            writeln!(stdout, "cd: {}: no such file or directory", self.target)?;
            return Ok(Outcome::Failure);
        }

        let canonical =
            fs::canonicalize(&new_dir).with_context(|| format!("cd: {}", self.target))?;
        env::set_current_dir(&canonical).with_context(|| format!("cd: {}", self.target))?;
        log::debug!("working directory is now {}", canonical.display());
        ctx.env.current_dir = canonical;
        Ok(Outcome::Success)
    }
}
