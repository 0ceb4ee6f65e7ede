//! Configuration module for mirrorctl
//!
//! One TOML file (default `/etc/mirrorctl.toml`, `--config` overrides):
//! a `[defaults]` table with the shared bandwidth limit and the expected
//! effective user, plus one `[mirror.<label>]` table per target. Sections
//! are synced in the order they appear in the file.

mod loader;
mod types;

pub use loader::ConfigWarning;
pub use types::{
    Config, DebmirrorTarget, Defaults, MirrorSection, MirrorTarget, RsyncTarget,
    DEFAULT_CONFIG_PATH,
};
