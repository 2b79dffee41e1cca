//! Local branch checkout through the git CLI

use crate::error::AppError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info};

/// Whether checkout switched to an existing branch or created a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Switched,
    Created,
}

/// Version-control operations the submit effect needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BranchCheckout: Send + Sync {
    async fn checkout(&self, branch_name: &str) -> Result<CheckoutOutcome, AppError>;
}

/// Runs `git` in `repo_dir` (the process working directory when `None`)
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    repo_dir: Option<PathBuf>,
}

impl GitCli {
    #[cfg(test)]
    pub fn in_dir(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: Some(repo_dir.into()),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<Output, AppError> {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.repo_dir {
            cmd.arg("-C").arg(dir);
        }
        cmd.args(args).kill_on_drop(true);
        debug!(?args, "running git");
        cmd.output()
            .await
            .map_err(|e| AppError::Subprocess(format!("failed to run git: {e}")))
    }

    async fn branch_exists(&self, branch_name: &str) -> Result<bool, AppError> {
        let reference = format!("refs/heads/{branch_name}");
        let output = self
            .git(&["show-ref", "--verify", "--quiet", &reference])
            .await?;
        Ok(output.status.success())
    }
}

fn checkout_error(branch_name: &str, output: &Output) -> AppError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    let status = output
        .status
        .code()
        .map(|code| format!("exit status {code}"))
        .unwrap_or_else(|| "terminated by signal".to_string());
    if detail.is_empty() {
        AppError::Subprocess(format!("failed to checkout branch {branch_name}: {status}"))
    } else {
        AppError::Subprocess(format!(
            "failed to checkout branch {branch_name}: {status}: {detail}"
        ))
    }
}

#[async_trait]
impl BranchCheckout for GitCli {
    async fn checkout(&self, branch_name: &str) -> Result<CheckoutOutcome, AppError> {
        let (args, outcome) = if self.branch_exists(branch_name).await? {
            (vec!["checkout", branch_name], CheckoutOutcome::Switched)
        } else {
            (vec!["checkout", "-b", branch_name], CheckoutOutcome::Created)
        };

        let output = self.git(&args).await?;
        if !output.status.success() {
            return Err(checkout_error(branch_name, &output));
        }
        info!(branch_name, ?outcome, "checked out branch");
        Ok(outcome)
    }
}
