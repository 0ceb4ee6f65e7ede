//! Run guard
//!
//! A single well-known lock file keeps two orchestrator instances from
//! running at once and colliding on the same destination trees. The lock is
//! a scoped resource: dropping the guard releases the OS lock and removes
//! the file, so every exit path (normal, error, panic unwind) lets the next
//! scheduled run proceed.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{MirrorError, MirrorResult};

/// Default lock file path for scheduler-driven runs.
pub const DEFAULT_LOCK_PATH: &str = "/tmp/mirrorctl.lock";

/// Exclusive, process-wide run lock. Held for the lifetime of the value.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock, failing immediately if another instance holds it.
    pub fn acquire(path: &Path) -> MirrorResult<RunLock> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)?;
        file.try_lock_exclusive()
            .map_err(|_| MirrorError::LockHeld {
                path: path.to_path_buf(),
            })?;
        Ok(RunLock {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");

        let held = RunLock::acquire(&path).unwrap();
        let err = RunLock::acquire(&path).unwrap_err();
        assert!(matches!(err, MirrorError::LockHeld { .. }));
        drop(held);
    }

    #[test]
    fn drop_releases_and_removes_lock_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.lock");

        drop(RunLock::acquire(&path).unwrap());
        assert!(!path.exists());
        let reacquired = RunLock::acquire(&path).unwrap();
        drop(reacquired);
    }
}
