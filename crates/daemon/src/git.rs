use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use nowplaying_core::PersistenceSink;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::BridgeConfig;

/// Persists status text by committing it to a git working tree.
#[derive(Clone, Debug)]
pub struct GitSink {
    repo_dir: PathBuf,
    status_file: String,
    remote: String,
    branch: String,
    author_name: Option<String>,
    author_email: Option<String>,
}

impl GitSink {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            status_file: config.status_file.clone(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            author_name: config.author_name.clone(),
            author_email: config.author_email.clone(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        if let Some(name) = &self.author_name {
            cmd.arg("-c").arg(format!("user.name={name}"));
        }
        if let Some(email) = &self.author_email {
            cmd.arg("-c").arg(format!("user.email={email}"));
        }
        cmd.args(args).current_dir(&self.repo_dir).kill_on_drop(true);
        cmd
    }

    /// Run git, returning its output whatever the exit status.
    async fn output(&self, args: &[&str]) -> Result<Output> {
        self.command(args)
            .output()
            .await
            .with_context(|| format!("run git {:?}", args))
    }

    /// Run git, failing on a non-zero exit. Returns trimmed stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let out = self.output(args).await?;
        if !out.status.success() {
            return Err(anyhow!(
                "command failed: git {:?}\nstdout:{}\nstderr:{}",
                args,
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    async fn is_inside_work_tree(&self) -> Result<bool> {
        let out = self.output(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(String::from_utf8_lossy(&out.stdout).trim() == "true")
    }

    async fn try_push(&self) -> Result<()> {
        let remotes = self.run(&["remote"]).await?;
        if !remotes.lines().any(|r| r.trim() == self.remote) {
            debug!(remote = %self.remote, "no remote configured; skipping push");
            return Ok(());
        }
        self.run(&["push", "--set-upstream", &self.remote, &self.branch]).await?;
        info!(remote = %self.remote, branch = %self.branch, "pushed");
        Ok(())
    }
}

#[async_trait]
impl PersistenceSink for GitSink {
    async fn ensure_repository_initialized(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.repo_dir)
            .await
            .with_context(|| format!("creating repo dir {}", self.repo_dir.display()))?;

        if self.is_inside_work_tree().await? {
            return Ok(());
        }

        info!(
            repo = %self.repo_dir.display(),
            branch = %self.branch,
            "initializing git repository"
        );
        self.run(&["init", "-b", &self.branch]).await?;
        self.run(&["add", "."]).await?;
        self.run(&["commit", "--allow-empty", "-m", "Initial commit"]).await?;
        Ok(())
    }

    async fn commit_snapshot_text(&self, text: &str) -> Result<bool> {
        let path = self.repo_dir.join(&self.status_file);
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        // reports untracked files too, unlike `git diff`
        let status = self.run(&["status", "--porcelain", "--", &self.status_file]).await?;
        if status.is_empty() {
            debug!(file = %self.status_file, "status file unchanged; nothing to commit");
            return Ok(false);
        }

        self.run(&["add", "--", &self.status_file]).await?;
        // pathspec keeps anything else the user staged out of the status commit
        self.run(&["commit", "-m", text, "--", &self.status_file]).await?;
        info!(file = %self.status_file, "committed status");
        Ok(true)
    }

    async fn push_if_remote_configured(&self) {
        // the next accepted update pushes again
        if let Err(e) = self.try_push().await {
            error!(error = %e, remote = %self.remote, "push failed");
        }
    }
}
