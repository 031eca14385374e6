//! Collaborator contracts and the records they produce.
//!
//! Five external collaborators feed the session banner. Each one is a
//! single-method trait returning a boxed [`SourceFuture`], so implementations
//! can shell out, hit the network, or read the filesystem without the
//! orchestrator knowing which.
//!
//! | Trait | Produces | Failure handling |
//! |-------|----------|------------------|
//! | [`LanguageDetector`] | language name | **mandatory**, faults propagate |
//! | [`GitInspector`] | [`GitInfo`] | optional, degrades to absent |
//! | [`SpecCounter`] | [`SpecProgress`] | optional, degrades to `{0,0,0}` |
//! | [`CheckpointLister`] | `Vec<`[`Checkpoint`]`>` | optional, degrades to empty |
//! | [`VersionLookup`] | [`VersionInfo`] | optional, degrades to absent |

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors a collaborator can report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The collaborator did not answer within its time budget.
    #[error("{signal} timed out after {timeout_ms}ms")]
    Timeout {
        /// Signal name (e.g. `git`).
        signal: String,
        /// Budget that was exceeded.
        timeout_ms: u64,
    },

    /// Filesystem or process I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed: {message}")]
    Command {
        /// Command line that was run.
        command: String,
        /// Exit status and stderr summary.
        message: String,
    },

    /// The collaborator answered, but the answer could not be understood.
    #[error("unexpected output: {0}")]
    Parse(String),

    /// The collaborator is not available in this environment.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Boxed future returned by every collaborator.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

// ── Records ────────────────────────────────────────────────────────

/// Version-control state of the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    /// Current branch name.
    pub branch: String,
    /// Full commit hash of `HEAD`.
    pub commit: String,
    /// Number of changed files in the working tree.
    pub changes: usize,
    /// Subject line of the last commit, if known.
    pub last_commit: Option<String>,
}

/// Specification-completion progress.
///
/// The default `{0, 0, 0}` doubles as the degraded value, so an unknown
/// count looks the same as a project with no specs yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecProgress {
    pub completed: usize,
    pub total: usize,
    /// Completion percentage, 0–100.
    pub percentage: u8,
}

impl SpecProgress {
    /// Build a progress record, deriving the percentage by integer division.
    pub fn new(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (completed.min(total) * 100 / total) as u8
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// A named restore point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// Branch-like label, possibly carrying a `before-` prefix.
    pub branch: String,
    /// Abbreviated commit the checkpoint points at.
    pub commit: Option<String>,
    /// When the checkpoint was created.
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl Checkpoint {
    /// A checkpoint known only by its label.
    pub fn labeled(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            commit: None,
            created_at: None,
        }
    }
}

/// Release information for the tool itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Installed version, or [`VersionInfo::UNKNOWN`].
    pub current: String,
    /// Latest published version.
    pub latest: String,
    pub update_available: bool,
    /// Command the user can run to upgrade.
    pub upgrade_command: Option<String>,
}

impl VersionInfo {
    /// Sentinel for an undeterminable installed version.
    pub const UNKNOWN: &'static str = "unknown";

    /// Version info with no update pending.
    pub fn current(version: impl Into<String>) -> Self {
        let current = version.into();
        Self {
            latest: current.clone(),
            current,
            update_available: false,
            upgrade_command: None,
        }
    }

    /// Whether the installed version could be determined.
    pub fn is_known(&self) -> bool {
        self.current != Self::UNKNOWN
    }
}

// ── Collaborator traits ────────────────────────────────────────────

/// Identifies the primary language of a project.
///
/// This is the one mandatory signal. Implementations should only fail
/// when the project itself is unusable (e.g. `cwd` is not a directory).
pub trait LanguageDetector: Send + Sync {
    fn detect_language<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, String>;
}

/// Reports branch, commit, and working-tree state.
pub trait GitInspector: Send + Sync {
    fn git_info<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, GitInfo>;
}

/// Counts specification documents and how many are completed.
pub trait SpecCounter: Send + Sync {
    fn count_specs<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, SpecProgress>;
}

/// Lists restore checkpoints, oldest first, at most `max_count` of the newest.
pub trait CheckpointLister: Send + Sync {
    fn list_checkpoints<'a>(
        &'a self,
        cwd: &'a Path,
        max_count: usize,
    ) -> SourceFuture<'a, Vec<Checkpoint>>;
}

/// Looks up installed and latest published versions.
pub trait VersionLookup: Send + Sync {
    fn version_info(&self) -> SourceFuture<'_, VersionInfo>;
}

// ── Unconfigured ───────────────────────────────────────────────────

/// Stand-in for any optional collaborator that has not been wired up.
///
/// Every call fails with [`SourceError::Unavailable`], which the
/// orchestrator turns into that signal's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

fn unconfigured<'a, T: 'a>(what: &'static str) -> SourceFuture<'a, T> {
    Box::pin(async move { Err(SourceError::Unavailable(format!("no {what} source configured"))) })
}

impl GitInspector for Unconfigured {
    fn git_info<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, GitInfo> {
        unconfigured("git")
    }
}

impl SpecCounter for Unconfigured {
    fn count_specs<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, SpecProgress> {
        unconfigured("spec")
    }
}

impl CheckpointLister for Unconfigured {
    fn list_checkpoints<'a>(
        &'a self,
        _cwd: &'a Path,
        _max_count: usize,
    ) -> SourceFuture<'a, Vec<Checkpoint>> {
        unconfigured("checkpoint")
    }
}

impl VersionLookup for Unconfigured {
    fn version_info(&self) -> SourceFuture<'_, VersionInfo> {
        unconfigured("version")
    }
}
