//! Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::MirrorError;

/// Default path the orchestrator reads its configuration from.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/mirrorctl.toml";

fn default_bwlimit() -> u32 {
    100
}

/// `[defaults]` table: values shared by every mirror section.
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    /// Shared bandwidth ceiling in Mbps
    #[serde(default = "default_bwlimit")]
    pub bwlimit: u32,

    /// Expected effective user; a mismatch aborts the whole run
    #[serde(default)]
    pub user: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            bwlimit: default_bwlimit(),
            user: None,
        }
    }
}

/// One `[mirror.<label>]` table, exactly as written in the file.
///
/// Every field is optional here; required-field checking happens per target
/// in [`MirrorSection::resolve`] so one malformed section cannot abort the
/// rest of the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorSection {
    /// Display label; falls back to the section key
    pub name: Option<String>,

    /// Sync strategy: "rsync" or "debmirror"
    #[serde(rename = "type")]
    pub sync_type: Option<String>,

    /// Combined rsync locator, e.g. `rsync://mirror.example.org/rocky`
    pub remote: Option<String>,

    /// Remote host; with `remote_dir`, the split form of the locator
    pub host: Option<String>,
    pub remote_dir: Option<String>,

    /// Local destination directory
    pub dest: Option<PathBuf>,

    /// Per-target bandwidth override in Mbps
    pub bwlimit: Option<u32>,

    /// Single remote file compared in a dry run to decide whether any
    /// transfer is needed at all
    pub precheck_file: Option<String>,

    /// Patterns excluded from every stage (and deleted from the destination)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Patterns excluded only from the first, non-deleting stage; non-empty
    /// switches the target to a two-stage sync
    #[serde(default)]
    pub firststage_exclude: Vec<String>,

    /// debmirror distribution/architecture/section lists
    #[serde(default)]
    pub dists: Vec<String>,
    #[serde(default)]
    pub arch: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,
}

/// A validated mirror target, ready to hand to a sync strategy.
#[derive(Debug, Clone)]
pub enum MirrorTarget {
    Rsync(RsyncTarget),
    Debmirror(DebmirrorTarget),
}

impl MirrorTarget {
    pub fn name(&self) -> &str {
        match self {
            MirrorTarget::Rsync(t) => &t.name,
            MirrorTarget::Debmirror(t) => &t.name,
        }
    }
}

/// File-tree mirror target (rsync strategy)
#[derive(Debug, Clone)]
pub struct RsyncTarget {
    pub name: String,
    pub remote: String,
    pub dest: PathBuf,
    pub bwlimit_mbps: u32,
    pub precheck_file: Option<String>,
    pub firststage_exclude: Vec<String>,
    pub exclude: Vec<String>,
}

/// Debian-archive mirror target (debmirror strategy)
#[derive(Debug, Clone)]
pub struct DebmirrorTarget {
    pub name: String,
    pub host: String,
    pub remote_dir: String,
    pub dest: PathBuf,
    pub dists: Vec<String>,
    pub arch: Vec<String>,
    pub sections: Vec<String>,
    pub bwlimit_mbps: u32,
}

impl MirrorSection {
    /// Display name for logging: explicit `name`, else the section key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }

    /// Validate required fields and build a concrete target.
    ///
    /// `key` is the section label; `default_bwlimit` comes from `[defaults]`.
    pub fn resolve(&self, key: &str, default_bwlimit: u32) -> Result<MirrorTarget, MirrorError> {
        let name = self.display_name(key).to_string();
        let missing = |field: &'static str| MirrorError::MissingField {
            field,
            section: name.clone(),
        };

        let sync_type = self.sync_type.as_deref().ok_or_else(|| missing("type"))?;
        let dest = self.dest.clone().ok_or_else(|| missing("dest"))?;
        let bwlimit_mbps = self.bwlimit.unwrap_or(default_bwlimit);

        match sync_type {
            "rsync" => {
                let remote = match (&self.remote, &self.host, &self.remote_dir) {
                    (Some(remote), _, _) => remote.clone(),
                    (None, Some(host), Some(dir)) => format!("rsync://{host}/{dir}"),
                    (None, None, _) => return Err(missing("remote")),
                    (None, Some(_), None) => return Err(missing("remote_dir")),
                };
                Ok(MirrorTarget::Rsync(RsyncTarget {
                    name,
                    remote,
                    dest,
                    bwlimit_mbps,
                    precheck_file: self.precheck_file.clone(),
                    firststage_exclude: self.firststage_exclude.clone(),
                    exclude: self.exclude.clone(),
                }))
            }
            "debmirror" => {
                let host = self.host.clone().ok_or_else(|| missing("host"))?;
                let remote_dir = self.remote_dir.clone().ok_or_else(|| missing("remote_dir"))?;
                if self.dists.is_empty() {
                    return Err(missing("dists"));
                }
                if self.arch.is_empty() {
                    return Err(missing("arch"));
                }
                if self.sections.is_empty() {
                    return Err(missing("sections"));
                }
                Ok(MirrorTarget::Debmirror(DebmirrorTarget {
                    name,
                    host,
                    remote_dir,
                    dest,
                    dists: self.dists.clone(),
                    arch: self.arch.clone(),
                    sections: self.sections.clone(),
                    bwlimit_mbps,
                }))
            }
            other => Err(MirrorError::UnknownSyncType {
                sync_type: other.to_string(),
                section: name,
            }),
        }
    }
}

/// Fully loaded configuration: shared defaults plus mirror sections in
/// file order.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: Defaults,
    /// (section key, raw section), in declaration order
    pub mirrors: Vec<(String, MirrorSection)>,
}
