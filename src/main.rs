use mini_shell::{Config, Interpreter};
use std::process::exit;

fn main() {
    let config = Config::from_env();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .format_timestamp(None)
        .init();

    match try_main(&config) {
        Ok(code) => exit(code),
        Err(e) => {
            log::error!("{:#}", e);
            exit(1);
        }
    }
}

fn try_main(config: &Config) -> anyhow::Result<i32> {
    let mut shell: Interpreter = Interpreter::default();
    match &config.command {
        Some(line) => shell.run_once(line),
        None => shell.repl(config),
    }
}
