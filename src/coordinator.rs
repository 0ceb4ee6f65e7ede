//! Mirror set coordinator
//!
//! Walks the configured mirror sections in file order, validates each one,
//! dispatches it to its sync strategy, and aggregates failures. One bad
//! target never stops the others; only whole-run problems (wrong effective
//! user) abort before any target is attempted.

use std::env;

use crate::config::{Config, MirrorTarget};
use crate::error::{MirrorError, MirrorResult};
use crate::sync::{DebmirrorStrategy, RsyncStrategy, SyncStatus};

/// Result of attempting one target's sync.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub name: String,
    pub succeeded: bool,
    /// Precheck found no change; nothing was transferred
    pub skipped: bool,
}

/// Aggregate result of one full run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Per-target outcomes, in configuration order
    pub outcomes: Vec<SyncOutcome>,
    /// Display names of targets whose sync did not succeed, in order
    pub failed: Vec<String>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Coordinator {
    config: Config,
    rsync: RsyncStrategy,
    debmirror: DebmirrorStrategy,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rsync: RsyncStrategy::new(),
            debmirror: DebmirrorStrategy::new(),
        }
    }

    /// Build a coordinator with explicit strategies (test seam).
    pub fn with_strategies(
        config: Config,
        rsync: RsyncStrategy,
        debmirror: DebmirrorStrategy,
    ) -> Self {
        Self {
            config,
            rsync,
            debmirror,
        }
    }

    /// Attempt every configured target, in order, and report.
    ///
    /// Returns `Err` only for whole-run configuration failures; per-target
    /// failures land in the report.
    pub fn run_all(&self) -> MirrorResult<RunReport> {
        if let Some(expected) = &self.config.defaults.user {
            verify_expected_user(expected, &current_user())?;
        }

        let mut report = RunReport::default();

        for (key, section) in &self.config.mirrors {
            println!("\n==========");
            let name = section.display_name(key).to_string();

            let status = match section.resolve(key, self.config.defaults.bwlimit) {
                Ok(target) => {
                    println!("* Syncing {name}");
                    match &target {
                        MirrorTarget::Rsync(t) => self.rsync.sync(t),
                        MirrorTarget::Debmirror(t) => self.debmirror.sync(t),
                    }
                }
                Err(e) => {
                    println!("{e}");
                    SyncStatus::Failed
                }
            };

            if !status.succeeded() {
                report.failed.push(name.clone());
            }
            report.outcomes.push(SyncOutcome {
                name,
                succeeded: status.succeeded(),
                skipped: status == SyncStatus::SkippedNoChange,
            });
        }

        if report.all_succeeded() {
            println!("* ALL MIRRORS SUCCEEDED");
        } else {
            println!("============");
            println!("failures syncing: {}", report.failed.join(", "));
        }

        Ok(report)
    }
}

fn verify_expected_user(expected: &str, actual: &str) -> MirrorResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MirrorError::WrongUser {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Effective user name, resolved the way login shells record it.
fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("LOGNAME"))
        .unwrap_or_default()
}
