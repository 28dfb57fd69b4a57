//! Helpers shared by the unit tests.

use crate::external::Launcher;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Serializes tests that read or change the process working directory.
pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn make_unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let p = std::env::temp_dir().join(format!(
        "mini_shell_test_{}_{}_{}",
        std::process::id(),
        tag,
        nanos
    ));
    fs::create_dir_all(&p).expect("create temp dir");
    p
}

/// Joins directories into a `PATH`-style string.
pub(crate) fn path_of(dirs: &[&Path]) -> String {
    dirs.iter()
        .map(|d| d.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// A launch observed by [`RecordingLauncher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Launch {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

/// Records launches instead of spawning processes.
#[derive(Debug, Default)]
pub(crate) struct RecordingLauncher {
    pub launches: Vec<Launch>,
    /// When set, every launch fails with this error kind.
    pub fail_with: Option<std::io::ErrorKind>,
}

impl Launcher for RecordingLauncher {
    fn launch(&mut self, program: &Path, args: &[String], current_dir: &Path) -> std::io::Result<()> {
        if let Some(kind) = self.fail_with {
            return Err(std::io::Error::from(kind));
        }
        self.launches.push(Launch {
            program: program.to_owned(),
            args: args.to_vec(),
            current_dir: current_dir.to_owned(),
        });
        Ok(())
    }
}
