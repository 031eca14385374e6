//! Hook settings: banner configuration plus collaborator wiring.
//!
//! [`HookSettings`] extends the library's [`BriefConfig`] with the knobs the
//! concrete collaborators need, and converts itself into ready-to-use
//! [`Sources`] via [`build_sources`](HookSettings::build_sources).
//!
//! The file lives at `<project>/.brief/settings.json` by default:
//!
//! ```json
//! {
//!   "banner": { "title": "Acme Session Started" },
//!   "gather": { "timeout_ms": 1500 },
//!   "sources": { "specs_dir": "docs/specs", "check_updates": false }
//! }
//! ```

use std::path::{Path, PathBuf};

use brief_rs::config::BriefConfig;
use brief_rs::orchestrator::Sources;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sources::{
    GitCheckpoints, GitCli, MarkerLanguageDetector, RegistryVersionLookup, SpecDirectoryCounter,
};

/// Settings path relative to the project root.
pub const SETTINGS_FILE: &str = ".brief/settings.json";

/// Complete settings for the `brief-hook` binary.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HookSettings {
    #[serde(flatten)]
    pub brief: BriefConfig,
    pub sources: SourcesConfig,
}

/// Collaborator settings.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SourcesConfig {
    /// Spec directory relative to the project root. Default: `".brief/specs"`.
    pub specs_dir: PathBuf,
    /// Branch prefix marking checkpoints. Default: `"before-"`.
    pub checkpoint_prefix: String,
    /// Query the registry for newer releases. Default: `true`.
    pub check_updates: bool,
    /// Package name looked up in the registry. Default: `"brief-hook"`.
    pub package: String,
    /// Registry crates endpoint. Default: `"https://crates.io/api/v1/crates"`.
    pub registry_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            specs_dir: PathBuf::from(".brief/specs"),
            checkpoint_prefix: "before-".to_string(),
            check_updates: true,
            package: "brief-hook".to_string(),
            registry_url: "https://crates.io/api/v1/crates".to_string(),
        }
    }
}

impl HookSettings {
    /// Default settings location for a project.
    pub fn default_path(cwd: &Path) -> PathBuf {
        cwd.join(SETTINGS_FILE)
    }

    /// Load from a JSON file. Returns defaults if the file doesn't exist or
    /// can't be parsed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(
                    "Failed to parse settings {}: {e}",
                    path.as_ref().display()
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn with_check_updates(mut self, enabled: bool) -> Self {
        self.sources.check_updates = enabled;
        self
    }

    /// Wire every collaborator from these settings.
    pub fn build_sources(&self) -> Sources {
        let version =
            RegistryVersionLookup::new(&self.sources.package, &self.sources.registry_url)
                .with_check_updates(self.sources.check_updates)
                .with_timeout(self.brief.gather.timeout());

        Sources::new(MarkerLanguageDetector)
            .with_git(GitCli)
            .with_specs(SpecDirectoryCounter::new(&self.sources.specs_dir))
            .with_checkpoints(GitCheckpoints::new(&self.sources.checkpoint_prefix))
            .with_version(version)
    }
}
