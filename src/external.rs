use crate::command::{Context, ExecutableCommand, Outcome};
use crate::env::Environment;
use crate::error::{ShellError, ShellResult};
use anyhow::Result;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Starts external programs on behalf of the shell.
///
/// The dispatcher only decides *what* to run; how a process is created is up to the
/// implementation. Tests use this seam to record launches instead of spawning.
pub trait Launcher {
    /// Launch `program` with `args`, in `current_dir`, sharing the shell's standard streams.
    fn launch(&mut self, program: &Path, args: &[String], current_dir: &Path) -> std::io::Result<()>;
}

/// Spawns a child process with inherited stdio and waits for it to finish.
///
/// The child's exit status is logged and otherwise discarded.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, program: &Path, args: &[String], current_dir: &Path) -> std::io::Result<()> {
        let mut child = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .current_dir(current_dir)
            .spawn()?;
        log::debug!("launched {} (pid {})", program.display(), child.id());
        let exit_status = child.wait()?;
        log::debug!(
            "{} exited with {}",
            program.display(),
            exit_code(exit_status)
        );
        Ok(())
    }
}

fn exit_code(exit_status: ExitStatus) -> i32 {
    match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Command that is not a builtin: a program found on PATH.
#[derive(Debug)]
pub struct ExternalCommand {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<String>, program: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program,
            args,
        }
    }

    /// Look `name` up on PATH and, when found, prepare a launch of it with `args`.
    pub fn resolve(env: &Environment, name: &str, args: &[String]) -> ShellResult<Option<Self>> {
        Ok(resolve(env, name)?.map(|program| Self::new(name, program, args.to_vec())))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, ctx: &mut Context<'_>) -> Result<Outcome> {
        match ctx
            .launcher
            .launch(&self.program, &self.args, &ctx.env.current_dir)
        {
            Ok(()) => Ok(Outcome::Success),
            Err(e) => {
                log::debug!("failed to launch {}: {}", self.program.display(), e);
                writeln!(stdout, "{}: {}", self.name, e)?;
                Ok(Outcome::Failure)
            }
        }
    }
}

/// Resolve `name` against the `PATH` variable of `env`.
///
/// `PATH` is read on every call. Its absence is an error the shell cannot recover
/// from: without a search path no external command can ever be found.
pub fn resolve(env: &Environment, name: &str) -> ShellResult<Option<PathBuf>> {
    let search_path = env.get_var("PATH").ok_or(ShellError::PathUnset)?;
    Ok(find_in_path(search_path, name))
}

/// Search the colon-separated `search_path` for an entry called `name`.
///
/// Behavior:
/// - Directories are tried in the order they appear; the first match wins.
/// - Only the immediate entries of each directory are listed, afresh on every call.
/// - A directory that cannot be listed (missing, unreadable, a plain file) is skipped.
/// - An entry matches when its path is exactly `dir + "/" + name`. Nothing else is
///   checked: neither the file type nor the executable bit.
pub fn find_in_path(search_path: &str, name: &str) -> Option<PathBuf> {
    for dir in search_path.split(':') {
        let key = format!("{}/{}", dir, name);
        log::trace!("looking for {} in {:?}", key, dir);
        if let Some(found) = list_dir(dir).into_iter().find(|p| p.as_os_str() == OsStr::new(&key)) {
            log::debug!("resolved {} to {}", name, found.display());
            return Some(found);
        }
    }
    None
}

fn list_dir(dir: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::trace!("skipping PATH entry {:?}: {}", dir, e);
            return Vec::new();
        }
    };
    entries.filter_map(|e| e.ok()).map(|e| e.path()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_unique_temp_dir, path_of};
    use std::fs;
    use std::fs::File;

    #[test]
    fn found_in_single_directory() {
        let dir = make_unique_temp_dir("single");
        File::create(dir.join("tool")).expect("touch tool");

        let found = find_in_path(&path_of(&[&dir]), "tool").expect("Expected to find 'tool'");
        assert_eq!(found, dir.join("tool"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn not_found_in_path() {
        let dir = make_unique_temp_dir("missing");
        let res = find_in_path(&path_of(&[&dir]), "nonexisting");
        assert!(res.is_none(), "Expected not to find 'nonexisting' in PATH");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn earlier_directory_wins() {
        let first = make_unique_temp_dir("first");
        let second = make_unique_temp_dir("second");
        File::create(first.join("dup")).expect("touch first/dup");
        File::create(second.join("dup")).expect("touch second/dup");

        let found = find_in_path(&path_of(&[&first, &second]), "dup").unwrap();
        assert_eq!(found, first.join("dup"));

        let found = find_in_path(&path_of(&[&second, &first]), "dup").unwrap();
        assert_eq!(found, second.join("dup"));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn unreadable_directories_are_skipped() {
        let dir = make_unique_temp_dir("skip");
        File::create(dir.join("tool")).expect("touch tool");
        let not_a_dir = dir.join("tool");
        let missing = dir.join("does-not-exist");

        let search = path_of(&[&missing, &not_a_dir, Path::new(""), &dir]);
        let found = find_in_path(&search, "tool").expect("later directory should still be searched");
        assert_eq!(found, dir.join("tool"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn match_is_exact_file_name() {
        let dir = make_unique_temp_dir("exact");
        File::create(dir.join("tool.sh")).expect("touch tool.sh");
        File::create(dir.join("toolbox")).expect("touch toolbox");

        let search = path_of(&[&dir]);
        assert!(find_in_path(&search, "tool").is_none());
        assert!(find_in_path(&search, "tool.sh").is_some());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn executable_bit_is_not_checked() {
        let dir = make_unique_temp_dir("nonexec");
        fs::create_dir(dir.join("subdir")).expect("mkdir subdir");
        File::create(dir.join("plain.txt")).expect("touch plain.txt");

        let search = path_of(&[&dir]);
        assert_eq!(find_in_path(&search, "plain.txt"), Some(dir.join("plain.txt")));
        assert_eq!(find_in_path(&search, "subdir"), Some(dir.join("subdir")));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn lookups_see_live_filesystem() {
        let dir = make_unique_temp_dir("live");
        let search = path_of(&[&dir]);
        assert!(find_in_path(&search, "late").is_none());

        File::create(dir.join("late")).expect("touch late");
        assert!(find_in_path(&search, "late").is_some());

        fs::remove_file(dir.join("late")).expect("rm late");
        assert!(find_in_path(&search, "late").is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_name_is_none() {
        let dir = make_unique_temp_dir("empty");
        File::create(dir.join("tool")).expect("touch tool");
        assert!(find_in_path(&path_of(&[&dir]), "").is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn resolve_without_path_is_fatal() {
        let env = Environment::with_vars([("HOME", "/")], "/");
        let err = resolve(&env, "ls").unwrap_err();
        assert!(matches!(err, ShellError::PathUnset));
    }

    #[test]
    fn resolve_reads_path_from_environment() {
        let dir = make_unique_temp_dir("resolve");
        File::create(dir.join("tool")).expect("touch tool");
        let mut env = Environment::with_vars([("PATH", path_of(&[&dir]))], "/");

        assert_eq!(resolve(&env, "tool").unwrap(), Some(dir.join("tool")));

        env.set_var("PATH", "/definitely/not/here");
        assert_eq!(resolve(&env, "tool").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn process_launcher_runs_program() {
        let dir = make_unique_temp_dir("launch");
        let marker = dir.join("marker");
        let mut launcher = ProcessLauncher;
        launcher
            .launch(
                Path::new("/bin/sh"),
                &["-c".to_string(), format!("touch {}", marker.display())],
                &dir,
            )
            .expect("spawn /bin/sh");
        assert!(marker.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn process_launcher_reports_spawn_errors() {
        let dir = make_unique_temp_dir("nospawn");
        let mut launcher = ProcessLauncher;
        let res = launcher.launch(&dir.join("no-such-program"), &[], &dir);
        assert!(res.is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
