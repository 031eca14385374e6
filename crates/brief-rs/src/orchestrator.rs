//! Source query orchestration.
//!
//! [`Sources`] bundles the five collaborators. [`Sources::gather`] queries
//! them for one project directory:
//!
//! 1. language detection: awaited first, with no failure boundary and no
//!    timeout. A fault here fails the whole hook.
//! 2. git info, spec progress, checkpoints (bounded by
//!    [`GatherConfig::max_checkpoints`]), and version info, spawned in that
//!    order through a [`SignalGatherer`]. Each one is isolated: any fault
//!    leaves that signal at its default and the rest are unaffected.

use std::path::Path;
use std::sync::Arc;

use crate::config::GatherConfig;
use crate::gather::SignalGatherer;
use crate::handler::HandlerError;
use crate::sources::{
    Checkpoint, CheckpointLister, GitInfo, GitInspector, LanguageDetector, SpecCounter,
    SpecProgress, Unconfigured, VersionInfo, VersionLookup,
};

/// Everything the composer needs from the collaborators.
///
/// Each optional field is either a collaborator's full answer or that
/// signal's default; it is never partially filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub language: String,
    /// Absent when git could not be queried.
    pub git: Option<GitInfo>,
    /// `{0,0,0}` when specs could not be counted.
    pub specs: SpecProgress,
    /// Oldest first. Empty when checkpoints could not be listed.
    pub checkpoints: Vec<Checkpoint>,
    /// Absent when the version lookup failed.
    pub version: Option<VersionInfo>,
}

impl Signals {
    /// Signals with only the mandatory language set.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }
}

/// The collaborators queried at session start.
#[derive(Clone)]
pub struct Sources {
    language: Arc<dyn LanguageDetector>,
    git: Arc<dyn GitInspector>,
    specs: Arc<dyn SpecCounter>,
    checkpoints: Arc<dyn CheckpointLister>,
    version: Arc<dyn VersionLookup>,
}

impl Sources {
    /// Start from the mandatory language detector. Optional collaborators
    /// default to [`Unconfigured`] and degrade until wired.
    pub fn new(language: impl LanguageDetector + 'static) -> Self {
        Self {
            language: Arc::new(language),
            git: Arc::new(Unconfigured),
            specs: Arc::new(Unconfigured),
            checkpoints: Arc::new(Unconfigured),
            version: Arc::new(Unconfigured),
        }
    }

    pub fn with_git(mut self, git: impl GitInspector + 'static) -> Self {
        self.git = Arc::new(git);
        self
    }

    pub fn with_specs(mut self, specs: impl SpecCounter + 'static) -> Self {
        self.specs = Arc::new(specs);
        self
    }

    pub fn with_checkpoints(mut self, checkpoints: impl CheckpointLister + 'static) -> Self {
        self.checkpoints = Arc::new(checkpoints);
        self
    }

    pub fn with_version(mut self, version: impl VersionLookup + 'static) -> Self {
        self.version = Arc::new(version);
        self
    }

    /// Query every collaborator for `cwd`.
    ///
    /// Only language detection can make this fail.
    pub async fn gather(&self, cwd: &Path, config: &GatherConfig) -> Result<Signals, HandlerError> {
        let language = self
            .language
            .detect_language(cwd)
            .await
            .map_err(|source| HandlerError::LanguageDetection {
                cwd: cwd.to_path_buf(),
                source,
            })?;

        let mut signals = Signals::for_language(language);

        let git = Arc::clone(&self.git);
        let specs = Arc::clone(&self.specs);
        let checkpoints = Arc::clone(&self.checkpoints);
        let version = Arc::clone(&self.version);
        let max_checkpoints = config.max_checkpoints;
        let (git_cwd, spec_cwd, checkpoint_cwd) =
            (cwd.to_path_buf(), cwd.to_path_buf(), cwd.to_path_buf());

        SignalGatherer::new(config.deadline())
            .task_timeout(config.timeout())
            .signal(
                "git",
                async move { git.git_info(&git_cwd).await },
                |info, s: &mut Signals| s.git = Some(info),
            )
            .signal(
                "specs",
                async move { specs.count_specs(&spec_cwd).await },
                |progress, s: &mut Signals| s.specs = progress,
            )
            .signal(
                "checkpoints",
                async move {
                    checkpoints
                        .list_checkpoints(&checkpoint_cwd, max_checkpoints)
                        .await
                },
                |list, s: &mut Signals| s.checkpoints = list,
            )
            .signal(
                "version",
                async move { version.version_info().await },
                |info, s: &mut Signals| s.version = Some(info),
            )
            .run(&mut signals)
            .await;

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{SourceError, SourceFuture};

    struct FixedLanguage(&'static str);

    impl LanguageDetector for FixedLanguage {
        fn detect_language<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, String> {
            let name = self.0.to_string();
            Box::pin(async move { Ok(name) })
        }
    }

    struct BrokenLanguage;

    impl LanguageDetector for BrokenLanguage {
        fn detect_language<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, String> {
            Box::pin(async { Err(SourceError::Unavailable("project root unreadable".into())) })
        }
    }

    struct CountingSpecs;

    impl SpecCounter for CountingSpecs {
        fn count_specs<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, SpecProgress> {
            Box::pin(async { Ok(SpecProgress::new(1, 4)) })
        }
    }

    #[tokio::test]
    async fn unconfigured_optionals_degrade_to_defaults() {
        let signals = Sources::new(FixedLanguage("Rust"))
            .gather(Path::new("."), &GatherConfig::default())
            .await
            .unwrap();
        assert_eq!(signals, Signals::for_language("Rust"));
    }

    #[tokio::test]
    async fn wired_optionals_are_collected() {
        let signals = Sources::new(FixedLanguage("Go"))
            .with_specs(CountingSpecs)
            .gather(Path::new("."), &GatherConfig::default())
            .await
            .unwrap();
        assert_eq!(signals.language, "Go");
        assert_eq!(signals.specs, SpecProgress::new(1, 4));
        assert!(signals.git.is_none());
    }

    #[tokio::test]
    async fn language_fault_propagates() {
        let err = Sources::new(BrokenLanguage)
            .with_specs(CountingSpecs)
            .gather(Path::new("/work"), &GatherConfig::default())
            .await
            .unwrap_err();
        let HandlerError::LanguageDetection { cwd, source } = err;
        assert_eq!(cwd, Path::new("/work"));
        assert!(matches!(source, SourceError::Unavailable(_)));
    }
}
