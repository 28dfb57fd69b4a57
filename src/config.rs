use argh::FromArgs;
use std::path::PathBuf;

fn default_prompt() -> String {
    String::from("$ ")
}

#[derive(FromArgs, Debug, Clone, PartialEq, Eq)]
/// A minimal interactive command shell.
pub struct Config {
    #[argh(option, default = "default_prompt()")]
    /// text printed before each input line. Defaults to "$ ".
    pub prompt: String,

    #[argh(option)]
    /// file the line-editing history is loaded from and saved to.
    pub history: Option<PathBuf>,

    #[argh(switch, short = 'v')]
    /// log dispatch decisions to standard error.
    pub verbose: bool,

    #[argh(option, short = 'c')]
    /// run a single command line and exit with its status.
    pub command: Option<String>,
}

impl Config {
    /// Parse the process arguments, exiting with usage on error or `--help`.
    pub fn from_env() -> Self {
        argh::from_env()
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history: None,
            verbose: false,
            command: None,
        }
    }
}
