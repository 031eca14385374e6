//! Checkpoint branches: local branches created before risky operations.
//!
//! A checkpoint's age is the time its branch was created, read from the
//! oldest entry of the branch reflog, not the tip commit's date. When the
//! reflog is gone (expired, or `core.logAllRefUpdates` off) the tip's
//! committer date stands in.

use std::path::Path;

use brief_rs::sources::{Checkpoint, CheckpointLister, SourceError, SourceFuture};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

use super::git::run_git;

const REF_FORMAT: &str = "--format=%(refname:short)%09%(objectname:short)%09%(creatordate:iso-strict)";

/// Lists local branches whose name starts with a prefix, in creation order.
#[derive(Debug, Clone)]
pub struct GitCheckpoints {
    prefix: String,
}

impl GitCheckpoints {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for GitCheckpoints {
    fn default() -> Self {
        Self::new("before-")
    }
}

impl CheckpointLister for GitCheckpoints {
    fn list_checkpoints<'a>(
        &'a self,
        cwd: &'a Path,
        max_count: usize,
    ) -> SourceFuture<'a, Vec<Checkpoint>> {
        Box::pin(async move {
            let pattern = format!("refs/heads/{}*", self.prefix);
            let output = run_git(cwd, &["for-each-ref", REF_FORMAT, pattern.as_str()]).await?;
            let mut all = parse_refs(&output)?;
            for checkpoint in &mut all {
                if let Some(created) = branch_created_at(cwd, &checkpoint.branch).await {
                    checkpoint.created_at = Some(created);
                }
            }
            // Stable: same-second checkpoints keep refname order.
            all.sort_by_key(|c| c.created_at);
            let skip = all.len().saturating_sub(max_count);
            Ok(all.into_iter().skip(skip).collect())
        })
    }
}

/// Time of the oldest reflog entry for `branch`, i.e. when it was created.
async fn branch_created_at(cwd: &Path, branch: &str) -> Option<DateTime<FixedOffset>> {
    let refname = format!("refs/heads/{branch}");
    match run_git(
        cwd,
        &["log", "-g", "--date=unix", "--format=%gd", refname.as_str()],
    )
    .await
    {
        Ok(output) => output.lines().rev().find_map(parse_reflog_selector),
        Err(e) => {
            debug!("No reflog for {branch}, using tip date: {e}");
            None
        }
    }
}

/// Parse the timestamp out of a `name@{<unix seconds>}` reflog selector.
fn parse_reflog_selector(selector: &str) -> Option<DateTime<FixedOffset>> {
    let (_, stamp) = selector.trim().rsplit_once("@{")?;
    let seconds = stamp.strip_suffix('}')?.parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0).map(|t| t.fixed_offset())
}

/// Parse tab-separated `for-each-ref` lines into checkpoints.
fn parse_refs(output: &str) -> Result<Vec<Checkpoint>, SourceError> {
    output
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let mut fields = line.split('\t');
            let branch = fields
                .next()
                .filter(|b| !b.is_empty())
                .ok_or_else(|| SourceError::Parse(format!("malformed ref line: {line:?}")))?;
            let commit = fields.next().filter(|c| !c.is_empty()).map(str::to_string);
            let created_at = fields.next().and_then(|d| match DateTime::parse_from_rfc3339(d) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    debug!("Ignoring creator date {d:?} on {branch}: {e}");
                    None
                }
            });
            Ok(Checkpoint {
                branch: branch.to_string(),
                commit,
                created_at,
            })
        })
        .collect()
}
