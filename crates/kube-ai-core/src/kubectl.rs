//! Thin wrapper around the `kubectl` binary.
//!
//! Reads (`get`, `describe`) capture stdout and stderr together, the way a
//! user would see them in a terminal. `apply` inherits the parent's stdio so
//! kubectl's own progress output reaches the user unchanged.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::config::Settings;
use crate::error::{KubeAiError, Result};

#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
}

impl Kubectl {
    /// Use an explicit binary path without checking that it exists.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Resolve the binary from settings, falling back to `kubectl` on `PATH`.
    pub fn locate(settings: &Settings) -> Result<Self> {
        if let Some(explicit) = &settings.kubectl {
            return Ok(Self::with_binary(explicit));
        }
        which::which("kubectl")
            .map(Self::with_binary)
            .map_err(|_| KubeAiError::KubectlNotFound)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `kubectl get <resource> -n <namespace> -o yaml`
    pub fn get_yaml(&self, resource: &str, namespace: &str) -> Result<String> {
        self.capture(&["get", resource, "-n", namespace, "-o", "yaml"])
    }

    /// `kubectl describe <resource> -n <namespace>`
    pub fn describe(&self, resource: &str, namespace: &str) -> Result<String> {
        self.capture(&["describe", resource, "-n", namespace])
    }

    /// `kubectl apply -f <path>` with inherited stdio.
    pub fn apply(&self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        let args = ["apply", "-f", path_str.as_ref()];
        tracing::debug!(binary = %self.binary.display(), ?args, "running kubectl");

        let status = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(KubeAiError::KubectlFailed {
                args: args.join(" "),
                status: status.to_string(),
                output: String::new(),
            });
        }
        Ok(())
    }

    fn capture(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(binary = %self.binary.display(), ?args, "running kubectl");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(KubeAiError::KubectlFailed {
                args: args.join(" "),
                status: output.status.to_string(),
                output: combined,
            });
        }
        Ok(combined)
    }

    fn spawn_error(&self, e: std::io::Error) -> KubeAiError {
        if e.kind() == std::io::ErrorKind::NotFound {
            KubeAiError::KubectlNotFound
        } else {
            KubeAiError::Io(e)
        }
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}
