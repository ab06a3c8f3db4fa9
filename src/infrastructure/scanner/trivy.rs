//! Trivy executor
//!
//! Invokes the Trivy CLI via subprocess against one image reference. Key
//! properties:
//! - Hard wall-clock timeout; the child is killed on expiry, never abandoned
//! - Address-space ceiling applied to the child before exec
//! - Ephemeral cache directory reclaimed on every exit path
//! - Exit failures classified into registry vs. scanner errors from stderr

use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::config::ScannerConfig;
use crate::domain::errors::ScanError;
use crate::domain::scanner::ImageScanner;
use crate::domain::value_objects::{ImageReference, RawReport, ScanBudget, ScanOptions};

/// Upper bound for the `--version` probe.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest stderr excerpt carried into an error message.
const MAX_STDERR_CHARS: usize = 400;

/// stderr markers for failures at the registry boundary. These are retryable
/// by the caller, unlike scanner-logic failures.
const REGISTRY_ERROR_MARKERS: &[&str] = &[
    "unable to find the specified image",
    "failed to pull the image",
    "connection refused",
    "connection reset",
    "no such host",
    "i/o timeout",
    "unauthorized",
    "authentication required",
    "manifest unknown",
    "name unknown",
    "x509:",
    "tls handshake",
];

/// stderr markers for memory exhaustion inside the child. Kept distinct from
/// timeouts per the executor contract.
const MEMORY_ERROR_MARKERS: &[&str] = &[
    "cannot allocate memory",
    "out of memory",
    "runtime: out of memory",
];

/// Trivy CLI executor.
pub struct TrivyExecutor {
    config: ScannerConfig,
    version: Option<String>,
}

impl TrivyExecutor {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            version: None,
        }
    }

    /// Probe `trivy --version` once and cache the first line.
    ///
    /// A missing binary is not fatal here: the service still starts and scan
    /// requests fail with a classified error instead.
    #[instrument(skip(self))]
    pub async fn probe_version(mut self) -> Self {
        let probe = Command::new(&self.config.executable)
            .arg("--version")
            .stdin(Stdio::null())
            .output();

        self.version = match timeout(VERSION_PROBE_TIMEOUT, probe).await {
            Ok(Ok(output)) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                debug!(version = %version, "Scanner found");
                Some(version).filter(|v| !v.is_empty())
            }
            _ => {
                warn!(
                    executable = %self.config.executable,
                    "Scanner version probe failed; scans will error until the binary is available"
                );
                None
            }
        };
        self
    }

    /// Assemble the CLI invocation for one scan.
    fn build_args(&self, image: &ImageReference, options: &ScanOptions, cache_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "image".into(),
            "--format".into(),
            "json".into(),
            "--quiet".into(),
            "--cache-dir".into(),
            cache_dir.as_os_str().to_owned(),
        ];
        if let Some(filter) = &options.severity_filter {
            args.push("--severity".into());
            args.push(filter.to_string().into());
        }
        if options.ignore_unfixed {
            args.push("--ignore-unfixed".into());
        }
        args.push(image.as_str().into());
        args
    }
}

#[async_trait]
impl ImageScanner for TrivyExecutor {
    fn name(&self) -> &'static str {
        "Trivy"
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    #[instrument(skip(self, options, budget), fields(image = %image))]
    async fn scan(
        &self,
        image: &ImageReference,
        options: &ScanOptions,
        budget: &ScanBudget,
    ) -> Result<RawReport, ScanError> {
        // Per-invocation scratch storage for pulled layers and the
        // vulnerability DB cache. The TempDir guard reclaims it on every exit
        // path out of this function, including the timeout return.
        let cache_dir = tempfile::tempdir()
            .map_err(|e| ScanError::InternalError(format!("failed to create scan scratch dir: {}", e)))?;

        let mut cmd = Command::new(&self.config.executable);
        cmd.args(self.build_args(image, options, cache_dir.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Registry credentials are opaque here; Trivy consumes them from its
        // own environment variables during the pull.
        if let Some(username) = &self.config.registry_username {
            cmd.env("TRIVY_USERNAME", username);
        }
        if let Some(password) = &self.config.registry_password {
            cmd.env("TRIVY_PASSWORD", password);
        }

        #[cfg(unix)]
        {
            let memory_bytes = budget.memory_ceiling_mb.saturating_mul(1024 * 1024);
            unsafe {
                cmd.pre_exec(move || {
                    nix::sys::resource::setrlimit(
                        nix::sys::resource::Resource::RLIMIT_AS,
                        memory_bytes,
                        memory_bytes,
                    )
                    .map_err(std::io::Error::other)
                });
            }
        }

        debug!(timeout_secs = budget.timeout.as_secs(), "Executing scanner");

        let child = cmd.spawn().map_err(|e| {
            ScanError::InternalError(format!(
                "failed to launch scanner '{}': {}",
                self.config.executable, e
            ))
        })?;

        // On expiry the wait future is dropped, which drops the child handle;
        // kill_on_drop then terminates the scan process rather than leaving it
        // orphaned for a reused execution context to find.
        let output = match timeout(budget.timeout, child.wait_with_output()).await {
            Ok(result) => result
                .map_err(|e| ScanError::InternalError(format!("failed to collect scanner output: {}", e)))?,
            Err(_) => {
                warn!(timeout_secs = budget.timeout.as_secs(), "Scan timed out; child killed");
                return Err(ScanError::ScanTimeout(budget.timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stdout.trim().is_empty() {
            return Err(classify_failure(&output.status, &stderr));
        }
        if !output.status.success() {
            // Trivy can exit non-zero while still emitting a usable report;
            // mirror that leniency but keep a trace of the exit state.
            warn!(exit_code = output.status.code(), "Scanner exited non-zero with output present");
        }

        Ok(RawReport::new(stdout.into_owned()))
    }
}

/// Classify a failed scanner exit from its status and stderr.
fn classify_failure(status: &ExitStatus, stderr: &str) -> ScanError {
    let stderr_lower = stderr.to_lowercase();
    let excerpt = excerpt(stderr);

    if killed_by_oom(status) || MEMORY_ERROR_MARKERS.iter().any(|m| stderr_lower.contains(m)) {
        return ScanError::ScanFailure(format!(
            "scanner exhausted its memory ceiling: {}",
            excerpt
        ));
    }
    if REGISTRY_ERROR_MARKERS.iter().any(|m| stderr_lower.contains(m)) {
        return ScanError::RegistryUnreachable(excerpt);
    }
    ScanError::ScanFailure(if excerpt.is_empty() {
        format!("scanner exited with status {} and produced no report", status)
    } else {
        excerpt
    })
}

#[cfg(unix)]
fn killed_by_oom(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(nix::libc::SIGKILL)
}

#[cfg(not(unix))]
fn killed_by_oom(_status: &ExitStatus) -> bool {
    false
}

fn excerpt(stderr: &str) -> String {
    stderr.trim().chars().take(MAX_STDERR_CHARS).collect()
}
