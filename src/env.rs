use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable state carried between dispatches.
///
/// The environment contains:
/// - `vars`: a snapshot of the process environment variables, read for `PATH`.
/// - `current_dir`: the working directory, changed by `cd` and printed by `pwd`.
///
/// Building it explicitly (instead of reading ambient process state everywhere) lets
/// tests run the dispatcher against a made-up `PATH`.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variables visible to the shell (e.g. PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// An environment with the given variables and working directory.
    pub fn with_vars<I, K, V>(vars: I, current_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            current_dir: current_dir.into(),
        }
    }

    /// Get the value of a variable from the snapshot.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable in the snapshot.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Drop a variable from the snapshot.
    pub fn remove_var(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;
    use std::env as stdenv;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::with_vars(
            Vec::<(String, String)>::new(),
            stdenv::current_dir().unwrap(),
        );

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE"));

        assert_eq!(env.remove_var("KEY"), Some("VALUE".to_string()));
        assert_eq!(env.get_var("KEY"), None);
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_env_snapshot_does_not_fall_back_to_process() {
        let env = Environment::with_vars([("HOME", "/nowhere")], "/");
        assert_eq!(env.get_var("HOME"), Some("/nowhere"));
        assert_eq!(env.get_var("PATH"), None);
    }
}
