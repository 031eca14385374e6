//! Git working-tree inspection through the `git` CLI.

use std::path::Path;

use brief_rs::sources::{GitInfo, GitInspector, SourceError, SourceFuture};
use tokio::process::Command;

// ── Helper ──────────────────────────────────────────────────────────

/// Run a git command in `workdir` and return its stdout.
///
/// The child is killed if the returned future is dropped, so a timed-out
/// signal does not leave a stray `git` behind.
pub(crate) async fn run_git(workdir: &Path, args: &[&str]) -> Result<String, SourceError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SourceError::Command {
            command: format!("git {}", args.join(" ")),
            message: format!("[exit: {code}] {}", stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Number of entries in `git status --porcelain` output.
fn count_changes(porcelain: &str) -> usize {
    porcelain.lines().filter(|l| !l.trim().is_empty()).count()
}

// ── GitCli ──────────────────────────────────────────────────────────

/// Reads branch, head commit, change count, and last commit subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitInspector for GitCli {
    fn git_info<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, GitInfo> {
        Box::pin(async move {
            let branch = run_git(cwd, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
            let commit = run_git(cwd, &["rev-parse", "HEAD"]).await?;
            let status = run_git(cwd, &["status", "--porcelain"]).await?;
            // An unborn branch has no last commit; that is not a failure.
            let last_commit = run_git(cwd, &["log", "-1", "--pretty=%s"])
                .await
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());

            Ok(GitInfo {
                branch: branch.trim().to_string(),
                commit: commit.trim().to_string(),
                changes: count_changes(&status),
                last_commit,
            })
        })
    }
}
