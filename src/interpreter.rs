use crate::builtin::Registry;
use crate::command::{Context, ExecutableCommand, Outcome};
use crate::config::Config;
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::{ExternalCommand, Launcher, ProcessLauncher};
use crate::parser::{self, ParsedCommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports builtins defined in this crate, see `BuiltinCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell interpreter that can execute built-in and external commands.
///
/// The interpreter owns everything that survives between two lines: the builtin
/// [`Registry`] (never changed after construction), the [`Environment`] (whose
/// working directory `cd` updates) and the [`Launcher`] used for programs found on
/// `PATH`.
///
/// Example
/// ```
/// use mini_shell::{Interpreter, Outcome};
/// let mut sh: Interpreter = Interpreter::default();
/// let mut out: Vec<u8> = Vec::new();
/// let outcome = sh.run_line("echo hello world", &mut out).unwrap();
/// assert_eq!(outcome, Outcome::Success);
/// assert_eq!(out, b"hello world\n");
/// ```
pub struct Interpreter<L = ProcessLauncher> {
    env: Environment,
    builtins: Registry,
    launcher: L,
}

impl<L: Launcher> Interpreter<L> {
    /// Create an interpreter with the default builtins.
    pub fn new(env: Environment, launcher: L) -> Self {
        Self::with_registry(env, Registry::default(), launcher)
    }

    /// Create an interpreter with a custom set of builtins.
    pub fn with_registry(env: Environment, builtins: Registry, launcher: L) -> Self {
        Self {
            env,
            builtins,
            launcher,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn builtins(&self) -> &Registry {
        &self.builtins
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run one parsed command.
    ///
    /// Builtins take precedence; any other name is looked up on `PATH` and handed to
    /// the launcher with the resolved path as program and the already split arguments.
    /// Returns `Unrecognized` when the name is found nowhere. Errors are fatal: a
    /// missing `PATH` variable or a failing `stdout`.
    pub fn dispatch(
        &mut self,
        parsed: &ParsedCommand,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<Outcome> {
        let command: Box<dyn ExecutableCommand> =
            match self.builtins.create(&parsed.name, &parsed.args) {
                Some(cmd) => {
                    log::debug!("{:?} is a builtin", parsed.name);
                    cmd
                }
                None => match ExternalCommand::resolve(&self.env, &parsed.name, &parsed.args)? {
                    Some(cmd) => {
                        log::debug!("{:?} resolved to {}", parsed.name, cmd.program().display());
                        Box::new(cmd)
                    }
                    None => {
                        log::debug!("{:?} is not a builtin and not on PATH", parsed.name);
                        return Ok(Outcome::Unrecognized);
                    }
                },
            };

        let mut ctx = Context {
            env: &mut self.env,
            builtins: &self.builtins,
            launcher: &mut self.launcher,
        };
        command.execute(stdout, &mut ctx)
    }

    /// Parse and dispatch a raw input line, reporting unknown commands.
    pub fn run_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<Outcome> {
        let parsed = parser::parse(line);
        let outcome = self.dispatch(&parsed, stdout)?;
        if outcome == Outcome::Unrecognized {
            writeln!(stdout, "{}: command not found", line.trim_end_matches(['\r', '\n']))?;
        }
        stdout.flush()?;
        Ok(outcome)
    }

    /// Run a single line against the process stdout, for `-c`.
    ///
    /// Returns the status the process should exit with.
    pub fn run_once(&mut self, line: &str) -> anyhow::Result<i32> {
        let outcome = self.run_line(line, &mut std::io::stdout())?;
        Ok(outcome.exit_code())
    }

    /// Read-Eval-Print Loop.
    ///
    /// Returns the status the process should exit with: the code given to `exit`, or 0
    /// when input ends.
    pub fn repl(&mut self, config: &Config) -> anyhow::Result<i32> {
        let mut rl = DefaultEditor::new().map_err(ShellError::from)?;
        if let Some(history) = &config.history {
            if let Err(err) = rl.load_history(history) {
                log::debug!("no history loaded from {}: {}", history.display(), err);
            }
        }

        let status = self.read_eval_print(&mut rl, &config.prompt);

        if let Some(history) = &config.history {
            if let Err(err) = rl.save_history(history) {
                log::warn!("failed to save history to {}: {}", history.display(), err);
            }
        }
        status
    }

    fn read_eval_print(&mut self, rl: &mut DefaultEditor, prompt: &str) -> anyhow::Result<i32> {
        let mut stdout = std::io::stdout();
        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).map_err(ShellError::from)?;
                    }
                    match self.run_line(&line, &mut stdout)? {
                        Outcome::Terminate(code) => {
                            log::debug!("exit requested with status {}", code);
                            return Ok(code);
                        }
                        Outcome::Success | Outcome::Failure | Outcome::Unrecognized => continue,
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(0),
                Err(err) => return Err(ShellError::from(err).into()),
            }
        }
    }
}

impl Default for Interpreter<ProcessLauncher> {
    /// An interpreter over the current process environment, launching real processes.
    fn default() -> Self {
        Self::new(Environment::new(), ProcessLauncher)
    }
}
