//! mirrorctl - scheduled repository mirroring orchestrator
//!
//! Reads a declarative configuration describing upstream package
//! repositories and, for each one, drives an external synchronization tool
//! (rsync for file trees, debmirror for Debian archives) to bring a local
//! directory into agreement with the remote. Built to run unattended from a
//! periodic scheduler, with a lock file enforcing a single instance.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod lock;
pub mod platform;
pub mod process;
pub mod sync;

// Re-exports for convenience
pub use config::{Config, MirrorTarget};
pub use coordinator::{Coordinator, RunReport, SyncOutcome};
pub use error::{MirrorError, MirrorResult};
pub use lock::RunLock;
pub use process::{Invocation, RetryPolicy};
pub use sync::{DebmirrorStrategy, RsyncStrategy, SyncStatus};
