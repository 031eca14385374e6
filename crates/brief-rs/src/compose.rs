//! Banner composition.
//!
//! [`Banner`] renders the session-start message from whatever the rule
//! extractor and the orchestrator produced. Sections appear in a fixed order
//! and are left out entirely when their data is missing; the title and the
//! language line are always present.

use crate::config::BannerConfig;
use crate::orchestrator::Signals;
use crate::rules::{CRITICAL_MARKER, CriticalRule};
use crate::sources::{Checkpoint, GitInfo, SpecProgress, VersionInfo};

/// Characters of the commit hash shown on the branch line.
const SHORT_COMMIT_LEN: usize = 7;

/// Prefix stripped from checkpoint labels.
const CHECKPOINT_PREFIX: &str = "before-";

/// A renderable session-start banner. Pure: same inputs, same text.
pub struct Banner<'a> {
    config: &'a BannerConfig,
    rules: &'a [CriticalRule],
    signals: &'a Signals,
}

impl<'a> Banner<'a> {
    pub fn new(config: &'a BannerConfig, rules: &'a [CriticalRule], signals: &'a Signals) -> Self {
        Self {
            config,
            rules,
            signals,
        }
    }

    /// Render the banner text. Never empty.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("🚀 {}", self.config.title), String::new()];

        self.push_rules(&mut lines);
        if let Some(version) = &self.signals.version {
            self.push_version(&mut lines, version);
        }
        lines.push(format!("   🐍 Language: {}", self.signals.language));
        if let Some(git) = &self.signals.git {
            push_git(&mut lines, git);
        }
        self.push_checkpoints(&mut lines, &self.signals.checkpoints);
        push_specs(&mut lines, &self.signals.specs);

        lines.join("\n")
    }

    fn push_rules(&self, lines: &mut Vec<String>) {
        if self.rules.is_empty() {
            return;
        }
        lines.push(format!("📋 Critical Rules (from {CRITICAL_MARKER}):"));
        lines.extend(self.rules.iter().map(|rule| format!("   • {rule}")));
        lines.push(String::new());
    }

    fn push_version(&self, lines: &mut Vec<String>, version: &VersionInfo) {
        if !version.is_known() {
            return;
        }
        let mut line = format!("   🗿 {} Ver: {}", self.config.product, version.current);
        if version.update_available {
            line.push_str(&format!(" → {} available ✨", version.latest));
        }
        lines.push(line);

        if version.update_available
            && let Some(command) = version.upgrade_command.as_deref().filter(|c| !c.is_empty())
        {
            lines.push(format!("   ⬆️ Upgrade: {command}"));
        }
    }

    fn push_checkpoints(&self, lines: &mut Vec<String>, checkpoints: &[Checkpoint]) {
        if checkpoints.is_empty() {
            return;
        }
        lines.push(format!("   🗂️  Checkpoints: {} available", checkpoints.len()));
        for checkpoint in checkpoints.iter().rev().take(self.config.listed_checkpoints) {
            lines.push(format!("      📌 {}", checkpoint_label(checkpoint)));
        }
        lines.push(String::new());
        lines.push(format!("   ↩️  Restore: {}", self.config.restore_command));
    }
}

fn push_git(lines: &mut Vec<String>, git: &GitInfo) {
    lines.push(format!(
        "   🌿 Branch: {} ({})",
        git.branch,
        short_commit(&git.commit)
    ));
    lines.push(format!("   📝 Changes: {}", git.changes));
    if let Some(last) = git.last_commit.as_deref().filter(|m| !m.is_empty()) {
        lines.push(format!("   🔨 Last: {last}"));
    }
}

fn push_specs(lines: &mut Vec<String>, specs: &SpecProgress) {
    if specs.total > 0 {
        lines.push(format!(
            "   📋 SPEC Progress: {}/{} ({}%)",
            specs.completed, specs.total, specs.percentage
        ));
    }
}

/// First seven characters of a commit hash.
fn short_commit(commit: &str) -> String {
    commit.chars().take(SHORT_COMMIT_LEN).collect()
}

/// Checkpoint label with a leading `before-` removed.
fn checkpoint_label(checkpoint: &Checkpoint) -> &str {
    checkpoint
        .branch
        .strip_prefix(CHECKPOINT_PREFIX)
        .unwrap_or(&checkpoint.branch)
}
