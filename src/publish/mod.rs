//! Publishing the written snapshot to a durable store.
//!
//! Publishing is best-effort: a failure is reported back to the
//! [`SnapshotWriter`](crate::store::SnapshotWriter), logged, and retried
//! naturally by the next scheduled run.
//!
//! - [`NoopPublisher`]: logs the decision only
//! - [`CommandPublisher`]: runs a shell command (`sh -c`)
//! - [`GitPublisher`]: `git add`, `git commit`, `git push`

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::info;

use crate::app::{NewswireError, Result};

pub trait Publisher: Send + Sync {
    /// Called only when `changed` is true by the snapshot writer, but
    /// implementations must tolerate `false`.
    fn publish(&self, changed: bool, paths: &[PathBuf]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn publish(&self, changed: bool, paths: &[PathBuf]) -> Result<()> {
        info!(
            "No publisher configured (changed: {}, {} files)",
            changed,
            paths.len()
        );
        Ok(())
    }
}

/// Runs a shell command with `NEWSWIRE_CHANGED` and `NEWSWIRE_PATHS` set.
#[derive(Debug, Clone)]
pub struct CommandPublisher {
    command: String,
    workdir: Option<PathBuf>,
}

impl CommandPublisher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            workdir: None,
        }
    }

    pub fn in_dir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }
}

impl Publisher for CommandPublisher {
    fn publish(&self, changed: bool, paths: &[PathBuf]) -> Result<()> {
        info!("Running publish command: {}", self.command);

        let joined = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&self.command)
            .env("NEWSWIRE_CHANGED", if changed { "1" } else { "0" })
            .env("NEWSWIRE_PATHS", joined);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .map_err(|e| NewswireError::Publish(format!("failed to spawn `sh`: {}", e)))?;
        check_status("publish command", &output)
    }
}

/// Commits the output files and pushes them.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo: PathBuf,
    message: String,
    push: bool,
}

impl GitPublisher {
    pub fn new(repo: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            message: message.into(),
            push: true,
        }
    }

    /// Commit without pushing.
    pub fn local_only(mut self) -> Self {
        self.push = false;
        self
    }

    fn git(&self, step: &str, args: &[&str]) -> Result<Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| NewswireError::Publish(format!("failed to spawn git {}: {}", step, e)))?;
        check_status(&format!("git {}", step), &output)?;
        Ok(output)
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, changed: bool, paths: &[PathBuf]) -> Result<()> {
        if !changed {
            return Ok(());
        }

        let mut add: Vec<String> = vec!["add".into(), "--".into()];
        add.extend(paths.iter().map(|p| relative_to(&self.repo, p)));
        let add_refs: Vec<&str> = add.iter().map(String::as_str).collect();
        self.git("add", &add_refs)?;

        // Nothing staged means an earlier run already committed this content,
        // though its push may have failed.
        let staged = Command::new("git")
            .args(["diff", "--cached", "--quiet"])
            .current_dir(&self.repo)
            .status()
            .map_err(|e| NewswireError::Publish(format!("failed to spawn git diff: {}", e)))?;
        if staged.success() {
            info!("Nothing to commit");
        } else {
            self.git("commit", &["commit", "-m", &self.message])?;
            info!("Committed snapshot: {}", self.message);
        }

        if self.push {
            self.git("push", &["push"])?;
            info!("Pushed snapshot");
        }
        Ok(())
    }
}

fn relative_to(repo: &Path, path: &Path) -> String {
    path.strip_prefix(repo)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn check_status(step: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(NewswireError::Publish(format!(
        "{} exited with {}: {}",
        step,
        output.status,
        stderr.trim()
    )))
}
