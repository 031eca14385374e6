//! The session-start entry handler.
//!
//! [`SessionStartHandler::handle`] is the whole hook: the phase filter
//! decides whether to render at all; if so, critical rules are extracted,
//! signals gathered, and the banner composed. The handler keeps no state
//! between invocations.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::compose::Banner;
use crate::config::BriefConfig;
use crate::hook::{HookResult, Payload};
use crate::orchestrator::Sources;
use crate::rules::RuleSources;
use crate::sources::SourceError;

/// Faults the handler does not mask.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The mandatory language signal failed.
    #[error("language detection failed for {}: {source}", .cwd.display())]
    LanguageDetection {
        /// Project directory that was inspected.
        cwd: PathBuf,
        #[source]
        source: SourceError,
    },
}

/// Renders the session-start banner for a hook payload.
pub struct SessionStartHandler {
    sources: Sources,
    config: BriefConfig,
    home: Option<PathBuf>,
}

impl SessionStartHandler {
    /// Create a handler. Without [`with_home`](Self::with_home) the
    /// user-global rule layer is skipped.
    pub fn new(sources: Sources, config: BriefConfig) -> Self {
        Self {
            sources,
            config,
            home: None,
        }
    }

    /// Home directory used to locate the user-global `CLAUDE.md`.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn config(&self) -> &BriefConfig {
        &self.config
    }

    /// Rule layers scanned for `cwd`: global, project, then configured extras.
    pub fn rule_sources(&self, cwd: &Path) -> RuleSources {
        self.config
            .rules
            .resolve(cwd)
            .into_iter()
            .fold(RuleSources::standard(self.home.as_deref(), cwd), |s, p| {
                s.with_candidate(p)
            })
    }

    /// Handle one session-start event.
    ///
    /// Returns an error only when language detection fails. The result
    /// always continues the host session.
    pub async fn handle(&self, payload: &Payload) -> Result<HookResult, HandlerError> {
        if !payload.phase.renders() {
            debug!("Skipping banner for phase '{}'", payload.phase);
            return Ok(HookResult::proceed());
        }

        let rules = self.rule_sources(&payload.cwd).extract();
        let signals = self
            .sources
            .gather(&payload.cwd, &self.config.gather)
            .await?;

        info!(
            rules = rules.len(),
            git = signals.git.is_some(),
            checkpoints = signals.checkpoints.len(),
            "Rendering session banner for {}",
            payload.cwd.display()
        );

        let message = Banner::new(&self.config.banner, &rules, &signals).render();
        Ok(HookResult::with_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{LanguageDetector, SourceFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingLanguage(Arc<AtomicUsize>);

    impl LanguageDetector for CountingLanguage {
        fn detect_language<'a>(&'a self, _cwd: &'a Path) -> SourceFuture<'a, String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok("Rust".to_string()) })
        }
    }

    #[tokio::test]
    async fn clear_phase_queries_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = SessionStartHandler::new(
            Sources::new(CountingLanguage(calls.clone())),
            BriefConfig::default(),
        );

        let result = handler.handle(&Payload::new("/nonexistent", "clear")).await.unwrap();
        assert_eq!(result, HookResult::proceed());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn render_phase_produces_message() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = SessionStartHandler::new(
            Sources::new(CountingLanguage(calls.clone())),
            BriefConfig::default().with_title("Test Session"),
        );

        let result = handler.handle(&Payload::new("/nonexistent", "compact")).await.unwrap();
        assert!(result.continue_execution);
        let message = result.system_message.unwrap();
        assert!(message.starts_with("🚀 Test Session"));
        assert!(message.contains("🐍 Language: Rust"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rule_sources_append_configured_layers() {
        let handler = SessionStartHandler::new(
            Sources::new(CountingLanguage(Arc::new(AtomicUsize::new(0)))),
            BriefConfig::default().with_rule_file(".team/CLAUDE.md"),
        )
        .with_home("/home/dev");

        let sources = handler.rule_sources(Path::new("/work"));
        assert_eq!(
            sources.candidates(),
            &[
                PathBuf::from("/home/dev/.claude/CLAUDE.md"),
                PathBuf::from("/work/CLAUDE.md"),
                PathBuf::from("/work/.team/CLAUDE.md"),
            ]
        );
    }

    #[test]
    fn language_error_message_names_directory() {
        let err = HandlerError::LanguageDetection {
            cwd: PathBuf::from("/work"),
            source: SourceError::Unavailable("gone".into()),
        };
        assert_eq!(
            err.to_string(),
            "language detection failed for /work: unavailable: gone"
        );
    }
}
