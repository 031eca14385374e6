//! Configuration for the session-start banner.
//!
//! Every field has a default, so an empty `{}` (or no file at all) gives a
//! working setup. Override specific sections through struct fields or the
//! builder methods.
//!
//! # Examples
//!
//! ```ignore
//! let config = BriefConfig::default()
//!     .with_title("Acme Session Started")
//!     .with_restore_command("acme restore")
//!     .with_timeout(Duration::from_millis(1500));
//! ```
//!
//! Loading from JSON:
//!
//! ```json
//! {
//!   "banner": { "title": "Acme Session Started", "listed_checkpoints": 5 },
//!   "gather": { "timeout_ms": 1500 },
//!   "rules": { "extra_files": [".team/CLAUDE.md"] }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ── Top level ─────────────────────────────────────────────────────

/// Complete configuration consumed by the
/// [`SessionStartHandler`](crate::handler::SessionStartHandler).
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BriefConfig {
    pub banner: BannerConfig,
    pub gather: GatherConfig,
    pub rules: RulesConfig,
}

impl BriefConfig {
    /// Load from a JSON file. Returns defaults if the file doesn't exist or
    /// can't be parsed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Failed to parse brief config: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.banner.title = title.into();
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.banner.product = product.into();
        self
    }

    pub fn with_restore_command(mut self, command: impl Into<String>) -> Self {
        self.banner.restore_command = command.into();
        self
    }

    /// Per-signal time budget for optional collaborators.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.gather.timeout_ms = duration_ms(timeout);
        self
    }

    /// Overall budget for all optional collaborators together.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.gather.deadline_ms = duration_ms(deadline);
        self
    }

    /// Append an extra rule layer, scanned after the project `CLAUDE.md`.
    pub fn with_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules.extra_files.push(path.into());
        self
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ── Banner ────────────────────────────────────────────────────────

/// Text used by the [`Banner`](crate::compose::Banner) composer.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BannerConfig {
    /// Title line text. Default: `"Brief Session Started"`.
    pub title: String,
    /// Product name shown on the version line. Default: `"Brief"`.
    pub product: String,
    /// Command shown on the restore hint. Default: `"git checkout <checkpoint>"`.
    pub restore_command: String,
    /// Number of checkpoints listed by name. Default: `3`.
    pub listed_checkpoints: usize,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            title: "Brief Session Started".to_string(),
            product: "Brief".to_string(),
            restore_command: "git checkout <checkpoint>".to_string(),
            listed_checkpoints: 3,
        }
    }
}

// ── Gather ────────────────────────────────────────────────────────

/// Latency budget and limits for the optional signals.
///
/// The gatherer enforces both bounds itself, whatever the collaborators
/// do: no single signal may take longer than `timeout_ms`, and all of them
/// together no longer than `deadline_ms`. A signal cut off either way
/// takes its default. Language detection is exempt from both. Raise both
/// to gather without a practical bound.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GatherConfig {
    /// Per-signal timeout in milliseconds. Default: `2000`.
    pub timeout_ms: u64,
    /// Global deadline in milliseconds. Default: `3000`.
    pub deadline_ms: u64,
    /// Upper bound passed to the checkpoint lister. Default: `10`.
    pub max_checkpoints: usize,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            deadline_ms: 3000,
            max_checkpoints: 10,
        }
    }
}

impl GatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

// ── Rules ─────────────────────────────────────────────────────────

/// Additional critical-rule layers.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// Files scanned after `{cwd}/CLAUDE.md`, in order. Relative paths
    /// resolve against the payload `cwd`.
    pub extra_files: Vec<PathBuf>,
}

impl RulesConfig {
    /// Resolve the extra layers against `cwd`.
    pub fn resolve(&self, cwd: &Path) -> Vec<PathBuf> {
        self.extra_files.iter().map(|p| cwd.join(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config: BriefConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BriefConfig::default());
        assert_eq!(config.gather.max_checkpoints, 10);
        assert_eq!(config.banner.listed_checkpoints, 3);
    }

    #[test]
    fn gather_is_bounded_by_default() {
        let gather = GatherConfig::default();
        assert_eq!(gather.timeout(), Duration::from_secs(2));
        assert_eq!(gather.deadline(), Duration::from_secs(3));
        assert!(gather.timeout() <= gather.deadline());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{"banner": {"title": "Acme"}, "gather": {"timeout_ms": 500}}"#;
        let config: BriefConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.banner.title, "Acme");
        assert_eq!(config.banner.product, "Brief");
        assert_eq!(config.gather.timeout(), Duration::from_millis(500));
        assert_eq!(config.gather.deadline(), Duration::from_millis(3000));
    }

    #[test]
    fn builders_override_fields() {
        let config = BriefConfig::default()
            .with_title("T")
            .with_product("P")
            .with_restore_command("undo")
            .with_timeout(Duration::from_millis(10))
            .with_deadline(Duration::from_secs(1))
            .with_rule_file(".team/CLAUDE.md");
        assert_eq!(config.banner.title, "T");
        assert_eq!(config.banner.product, "P");
        assert_eq!(config.banner.restore_command, "undo");
        assert_eq!(config.gather.timeout_ms, 10);
        assert_eq!(config.gather.deadline_ms, 1000);
        assert_eq!(
            config.rules.resolve(Path::new("/work")),
            vec![PathBuf::from("/work/.team/CLAUDE.md")]
        );
    }

    #[test]
    fn absolute_extra_files_stay_absolute() {
        let rules = RulesConfig {
            extra_files: vec![PathBuf::from("/etc/team/CLAUDE.md")],
        };
        assert_eq!(
            rules.resolve(Path::new("/work")),
            vec![PathBuf::from("/etc/team/CLAUDE.md")]
        );
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        assert_eq!(
            BriefConfig::load("/nonexistent/brief.json"),
            BriefConfig::default()
        );
    }

    #[test]
    fn load_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(BriefConfig::load(&path), BriefConfig::default());
    }
}
