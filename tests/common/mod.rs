//! Common test utilities for mirrorctl integration tests.
//!
//! Provides `TestEnv`: an isolated temp directory holding a config file, a
//! lock file path, and a fake-tool bin directory that is prepended to PATH
//! so the orchestrator's `rsync`/`debmirror` lookups resolve to recording
//! shell scripts instead of the real tools.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Result of running the mirrorctl binary
#[derive(Debug)]
pub struct TestResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub struct TestEnv {
    pub root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("fakebin")).unwrap();
        let env = Self {
            root,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_mirrorctl")),
        };
        // Red-Hat-family hosts run a context-restore pass after a
        // successful sync; shadow it so tests never touch the real tool.
        env.install_fake_tool("restorecon", "exit 0");
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write the config file the run under test will load.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.path("mirrorctl.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Install a fake external tool under `fakebin/`, shadowing the real
    /// one via PATH. The script appends its arguments to `<name>.log`.
    pub fn install_fake_tool(&self, name: &str, body: &str) {
        let log = self.path(&format!("{name}.log"));
        let path = self.path(&format!("fakebin/{name}"));
        let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\n{body}\n", log.display());
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Lines logged by a fake tool, in invocation order.
    pub fn tool_log(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.path(&format!("{name}.log")))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Run mirrorctl against this environment's config and lock file.
    pub fn run(&self) -> TestResult {
        self.run_with_env(&[])
    }

    pub fn run_with_env(&self, env_vars: &[(&str, &str)]) -> TestResult {
        let path_var = format!(
            "{}:{}",
            self.path("fakebin").display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let mut cmd = Command::new(&self.bin);
        cmd.arg("--config")
            .arg(self.path("mirrorctl.toml"))
            .arg("--lock-file")
            .arg(self.path("mirrorctl.lock"))
            .env("PATH", path_var);
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to run mirrorctl binary");
        TestResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
