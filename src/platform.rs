//! Host platform fixups
//!
//! Red-Hat-family hosts label files with SELinux security contexts; files
//! written by rsync or debmirror come in unlabeled, so a successful sync is
//! followed by a best-effort `restorecon -R` over the destination. Failure
//! of the fixup is logged by the process runner but never fails the target.

use std::fs;
use std::path::Path;

use crate::process::Invocation;

const REDHAT_RELEASE: &str = "/etc/redhat-release";

const REDHAT_MARKERS: &[&str] = &["Red Hat", "CentOS", "Fedora", "Rocky Linux", "AlmaLinux"];

/// Whether the current host is a Red-Hat-family distribution.
pub fn is_redhat_based() -> bool {
    match fs::read_to_string(REDHAT_RELEASE) {
        Ok(content) => release_is_redhat(&content),
        Err(_) => false,
    }
}

fn release_is_redhat(content: &str) -> bool {
    REDHAT_MARKERS.iter().any(|m| content.contains(m))
}

/// Re-label `dest` after a successful sync. Best-effort only.
pub fn restore_selinux_context(restorecon: &str, dest: &Path) {
    println!("* Restoring SELinux context on {}", dest.display());
    let _ = Invocation::new([
        restorecon.to_string(),
        "-R".to_string(),
        dest.display().to_string(),
    ])
    .run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_redhat_family_release_strings() {
        assert!(release_is_redhat("Rocky Linux release 9.3 (Blue Onyx)"));
        assert!(release_is_redhat("CentOS Stream release 9"));
        assert!(release_is_redhat("Fedora release 40 (Forty)"));
        assert!(release_is_redhat("AlmaLinux release 9.4 (Seafoam Ocelot)"));
        assert!(release_is_redhat(
            "Red Hat Enterprise Linux release 9.4 (Plow)"
        ));
    }

    #[test]
    fn ignores_other_distributions() {
        assert!(!release_is_redhat("Ubuntu 24.04 LTS"));
        assert!(!release_is_redhat(""));
    }
}
