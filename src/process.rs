//! External process execution
//!
//! Everything the orchestrator does happens through an external tool, so
//! every invocation is echoed to stdout (shell-quoted) before it runs and
//! its outcome is reported as it happens. A bounded [`RetryPolicy`] re-runs
//! commands whose exit code is registered as transient; any other nonzero
//! code, and any spawn error, fails immediately.
//!
//! Invocations are synchronous: one child runs to completion before the
//! next starts.

use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Attempt budget used when retryable codes are configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Bounded retry policy keyed on specific exit codes.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    max_attempts: u32,
    retry_codes: Vec<i32>,
}

impl RetryPolicy {
    /// No retries: the command runs exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            retry_codes: Vec::new(),
        }
    }

    /// Retry on the given exit codes, up to [`DEFAULT_MAX_ATTEMPTS`] total
    /// attempts.
    pub fn on_codes(codes: &[i32]) -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_codes: codes.to_vec(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    fn is_retryable(&self, code: i32) -> bool {
        self.retry_codes.contains(&code)
    }
}

/// Result of running one invocation to completion (including retries).
#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    /// Decoded stdout of the final attempt, when capture was requested and
    /// the run succeeded
    pub stdout: Option<String>,
}

impl RunOutput {
    fn failure() -> Self {
        Self {
            success: false,
            stdout: None,
        }
    }
}

/// One external command execution attempt.
#[derive(Debug, Clone)]
pub struct Invocation {
    args: Vec<String>,
    capture_output: bool,
    retry: RetryPolicy,
}

impl Invocation {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            capture_output: false,
            retry: RetryPolicy::none(),
        }
    }

    /// Capture stdout of the child instead of letting it flow to ours.
    pub fn capture_output(mut self) -> Self {
        self.capture_output = true;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Run the command, blocking until it exits, retrying per the policy.
    pub fn run(&self) -> RunOutput {
        let max_attempts = self.retry.max_attempts();
        let mut last_code = 0;

        for attempt in 1..=max_attempts {
            announce(&format!("\n* Running: {}", render_cmdline(&self.args)));

            let mut cmd = Command::new(&self.args[0]);
            cmd.args(&self.args[1..]);

            let (code, stdout) = if self.capture_output {
                cmd.stderr(Stdio::inherit());
                match cmd.output() {
                    Ok(out) => (
                        out.status.code().unwrap_or(-1),
                        Some(String::from_utf8_lossy(&out.stdout).into_owned()),
                    ),
                    Err(e) => {
                        announce(&format!("* FAILED: {e}"));
                        return RunOutput::failure();
                    }
                }
            } else {
                match cmd.status() {
                    Ok(status) => (status.code().unwrap_or(-1), None),
                    Err(e) => {
                        announce(&format!("* FAILED: {e}"));
                        return RunOutput::failure();
                    }
                }
            };

            if code == 0 {
                announce("* SUCCESS");
                return RunOutput {
                    success: true,
                    stdout,
                };
            }

            last_code = code;
            if !self.retry.is_retryable(code) {
                break;
            }
            if attempt < max_attempts {
                announce(&format!("* RETRYING due to rc={code}"));
            }
        }

        announce(&format!("* FAILED (rc={last_code})"));
        RunOutput::failure()
    }
}

/// Print a progress line immediately so it interleaves correctly with
/// child output.
fn announce(line: &str) {
    println!("{line}");
    let _ = io::stdout().flush();
}

/// Render an argument vector the way a user could paste it into a shell.
pub fn render_cmdline(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leave the argument bare unless it contains a character the shell would
/// interpret; otherwise escape and wrap in double quotes.
fn quote_arg(arg: &str) -> String {
    if !arg.contains([' ', '"', '\\', '*', '|']) {
        return arg.to_string();
    }
    let escaped = arg.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
