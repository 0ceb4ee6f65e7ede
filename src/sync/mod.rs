//! Sync strategies
//!
//! One module per external tool: [`rsync`] implements the precheck +
//! optional two-stage + final-sync protocol for file trees, [`debmirror`]
//! wraps the Debian archive mirroring tool as a single opaque invocation.
//! Both share destination preparation and the post-sync SELinux fixup.

pub mod debmirror;
pub mod rsync;

use std::fs::DirBuilder;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use crate::error::{MirrorError, MirrorResult};

pub use debmirror::DebmirrorStrategy;
pub use rsync::RsyncStrategy;

/// Result of attempting one target's sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// A transfer ran and completed
    Synced,
    /// Precheck found nothing to do; no transfer ran
    SkippedNoChange,
    Failed,
}

impl SyncStatus {
    pub fn succeeded(self) -> bool {
        !matches!(self, SyncStatus::Failed)
    }
}

/// Make sure `dest` exists as a writable directory, creating it and its
/// parents with mode 0755 if absent.
///
/// Not atomic against concurrent external modification; the run lock is
/// what keeps two orchestrator instances off the same tree.
pub fn ensure_dest_dir(path: &Path) -> MirrorResult<()> {
    let invalid = |message: &str| MirrorError::InvalidDestination {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    if path.exists() {
        if !path.is_dir() {
            return Err(invalid("path must be a directory"));
        }
        // Probe with an unnamed temp file; metadata bits alone don't answer
        // "writable by the current user".
        tempfile::tempfile_in(path).map_err(|_| invalid("path must be writable"))?;
        return Ok(());
    }

    DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)
        .map_err(|e| invalid(&format!("unable to create path: {e}")))?;
    Ok(())
}

/// The mirroring tools treat `a/` as "contents of a" and `a` as the entry
/// itself; every remote and destination goes through here first.
pub(crate) fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
