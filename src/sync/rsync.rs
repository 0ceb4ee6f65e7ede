//! File-tree mirror strategy
//!
//! Brings a destination directory into agreement with a remote rsync module
//! using the minimum necessary work:
//!
//! 1. an optional dry-run precheck of a single file decides whether any
//!    transfer is needed at all;
//! 2. an optional first stage pulls bulk content with extra exclusions and
//!    no deletions, so an interrupted run never removes files the final
//!    stage still has to reconcile;
//! 3. the final stage transfers everything with `--delete-delay` and
//!    `--delay-updates`, committing deletions and replacements only after
//!    the full file list is known.
//!
//! Every stage retries on rsync's "partial transfer due to vanished source
//! files" exit code and on nothing else.

use crate::config::RsyncTarget;
use crate::platform;
use crate::process::{Invocation, RetryPolicy};

use super::{ensure_dest_dir, with_trailing_slash, SyncStatus};

/// rsync exit code 24: source files vanished mid-transfer, safe to retry.
pub const RSYNC_VANISHED_FILES: i32 = 24;

/// Sync protocol engine for one rsync target.
#[derive(Debug, Clone)]
pub struct RsyncStrategy {
    program: String,
    restorecon: String,
}

impl Default for RsyncStrategy {
    fn default() -> Self {
        Self {
            program: "rsync".to_string(),
            restorecon: "restorecon".to_string(),
        }
    }
}

impl RsyncStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the rsync executable (test seam).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Run the full protocol for one target.
    pub fn sync(&self, target: &RsyncTarget) -> SyncStatus {
        if let Err(e) = ensure_dest_dir(&target.dest) {
            eprintln!("{e}");
            return SyncStatus::Failed;
        }

        let remote = with_trailing_slash(&target.remote);
        let dest = with_trailing_slash(&target.dest.display().to_string());
        let transient = RetryPolicy::on_codes(&[RSYNC_VANISHED_FILES]);

        if let Some(file) = &target.precheck_file {
            println!("* Running precheck");
            let out = Invocation::new([
                self.program.clone(),
                "--no-motd".to_string(),
                "--dry-run".to_string(),
                "--out-format=%n".to_string(),
                format!("{remote}{file}"),
                format!("{dest}{file}"),
            ])
            .capture_output()
            .retry(transient.clone())
            .run();

            if !out.success {
                return SyncStatus::Failed;
            }
            if out.stdout.as_deref().map_or(true, str::is_empty) {
                println!("* No changes, skipping sync");
                return SyncStatus::SkippedNoChange;
            }
        }

        let mut common = vec![
            self.program.clone(),
            "--recursive".to_string(),
            "--links".to_string(),
            "--perms".to_string(),
            "--times".to_string(),
            "--devices".to_string(),
            "--specials".to_string(),
            "--sparse".to_string(),
            "--partial".to_string(),
            "--hard-links".to_string(),
            "--exclude=*.~tmp~".to_string(),
            "--delete-excluded".to_string(),
            format!("--bwlimit={}", target.bwlimit_mbps * 1024),
        ];
        for pattern in &target.exclude {
            common.push(format!("--exclude={pattern}"));
        }

        if !target.firststage_exclude.is_empty() {
            println!("* Running Stage 1");
            let mut args = common.clone();
            for pattern in &target.firststage_exclude {
                args.push(format!("--exclude={pattern}"));
            }
            args.push(remote.clone());
            args.push(dest.clone());

            if !Invocation::new(args).retry(transient.clone()).run().success {
                return SyncStatus::Failed;
            }
        }

        println!("* Running Final Sync");
        let mut args = common;
        args.push("--delete-delay".to_string());
        args.push("--delay-updates".to_string());
        args.push(remote);
        args.push(dest);

        let success = Invocation::new(args).retry(transient).run().success;

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
