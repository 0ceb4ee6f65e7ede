//! Debian-archive mirror strategy
//!
//! debmirror handles its own protocol (distributions × architectures ×
//! sections), so this strategy is a single opaque invocation plus the
//! shared destination preparation and SELinux fixup. No retry policy: the
//! tool retries internally.

use crate::config::DebmirrorTarget;
use crate::platform;
use crate::process::Invocation;

use super::{ensure_dest_dir, with_trailing_slash, SyncStatus};

#[derive(Debug, Clone)]
pub struct DebmirrorStrategy {
    program: String,
    restorecon: String,
}

impl Default for DebmirrorStrategy {
    fn default() -> Self {
        Self {
            program: "debmirror".to_string(),
            restorecon: "restorecon".to_string(),
        }
    }
}

impl DebmirrorStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the debmirror executable (test seam).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn sync(&self, target: &DebmirrorTarget) -> SyncStatus {
        if let Err(e) = ensure_dest_dir(&target.dest) {
            eprintln!("{e}");
            return SyncStatus::Failed;
        }

        let dest = with_trailing_slash(&target.dest.display().to_string());
        let success = Invocation::new([
            self.program.clone(),
            "--method=rsync".to_string(),
            // most efficient diff mode when the transport is already rsync
            "--diff=none".to_string(),
            format!("--host={}", target.host),
            format!("--root={}", target.remote_dir),
            format!("--dist={}", target.dists.join(",")),
            format!("--arch={}", target.arch.join(",")),
            format!("--section={}", target.sections.join(",")),
            // the default batch of 200 stalls large archives
            "--rsync-batch=10000".to_string(),
            "--no-check-gpg".to_string(),
            format!(
                "--rsync-options=-aIL --partial --bwlimit={}",
                target.bwlimit_mbps * 1024
            ),
            dest,
        ])
        .run()
        .success;

        if success && platform::is_redhat_based() {
            platform::restore_selinux_context(&self.restorecon, &target.dest);
        }

        if success {
            SyncStatus::Synced
        } else {
            SyncStatus::Failed
        }
    }
}
