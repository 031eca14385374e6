//! Critical-rule extraction from `CLAUDE.md` files.
//!
//! Users pin directives they want repeated at every session start inside an
//! `@USER_CRITICAL` block:
//!
//! ```text
//! ## @USER_CRITICAL
//! - Never push to main
//! - Run the linter before committing
//! CRITICAL: this line is a label and is dropped
//! ## Next section
//! ```
//!
//! Capture starts on the line after the first marker and ends at the next
//! line whose first character is `#`. Blank lines, `#` lines, and lines
//! starting with `CRITICAL:` are dropped; everything else is kept, trimmed.
//!
//! Files are read from an ordered list of layers (user-global first, then
//! project). Missing or unreadable layers contribute nothing.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Marker that opens a critical-rule block.
pub const CRITICAL_MARKER: &str = "@USER_CRITICAL";

/// Prefix of label lines dropped from a block.
const LABEL_PREFIX: &str = "CRITICAL:";

/// A single user-authored directive: trimmed, non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CriticalRule(String);

impl CriticalRule {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriticalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered candidate files scanned for critical rules.
///
/// Search order for [`RuleSources::standard`]:
/// 1. `{home}/.claude/CLAUDE.md` (user-global, skipped when no home is known)
/// 2. `{cwd}/CLAUDE.md`
///
/// Further layers appended with [`with_candidate`](Self::with_candidate) go
/// through the same scan.
#[derive(Debug, Clone, Default)]
pub struct RuleSources {
    candidates: Vec<PathBuf>,
}

impl RuleSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The global + project layers.
    pub fn standard(home: Option<&Path>, cwd: &Path) -> Self {
        let mut sources = Self::new();
        if let Some(home) = home {
            sources = sources.with_candidate(home.join(".claude").join("CLAUDE.md"));
        }
        sources.with_candidate(cwd.join("CLAUDE.md"))
    }

    /// Append another layer after the existing ones.
    pub fn with_candidate(mut self, path: impl Into<PathBuf>) -> Self {
        self.candidates.push(path.into());
        self
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Scan every layer in order and collect their rules.
    ///
    /// Never fails: a layer that cannot be read is skipped without affecting
    /// the others.
    pub fn extract(&self) -> Vec<CriticalRule> {
        let mut rules = Vec::new();
        for path in &self.candidates {
            match read_optional(path) {
                Some(content) => rules.extend(parse_critical_block(&content)),
                None => debug!("No readable rule file at {}", path.display()),
            }
        }
        rules
    }
}

/// Parse the first `@USER_CRITICAL` block of `content`.
pub fn parse_critical_block(content: &str) -> Vec<CriticalRule> {
    let mut rules = Vec::new();
    let mut capturing = false;

    for line in content.lines() {
        // Checked before the terminator: a marker line never ends a block,
        // and a repeated marker inside a block is skipped.
        if line.contains(CRITICAL_MARKER) {
            capturing = true;
            continue;
        }
        if !capturing {
            continue;
        }
        if line.starts_with('#') {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(LABEL_PREFIX) {
            continue;
        }
        rules.push(CriticalRule(trimmed.to_string()));
    }

    rules
}

// ── Private helpers ──────────────────────────────────────────────────

/// Read a file if it exists, is readable, and is valid UTF-8.
fn read_optional(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(rules: &[CriticalRule]) -> Vec<&str> {
        rules.iter().map(CriticalRule::as_str).collect()
    }

    #[test]
    fn block_ends_at_next_heading() {
        let rules = parse_critical_block("@USER_CRITICAL\n- rule1\n- rule2\n# Next\nignored");
        assert_eq!(texts(&rules), vec!["- rule1", "- rule2"]);
    }

    #[test]
    fn marker_may_appear_inside_a_heading() {
        let content = "# Project\n\n## @USER_CRITICAL\n- keep tests green\n\n## Style\n- tabs";
        let rules = parse_critical_block(content);
        assert_eq!(texts(&rules), vec!["- keep tests green"]);
    }

    #[test]
    fn drops_blank_label_and_indented_hash_lines() {
        let content = "@USER_CRITICAL\n\nCRITICAL: read me\n   # indented comment\n  **Bold rule**  \n";
        let rules = parse_critical_block(content);
        assert_eq!(texts(&rules), vec!["**Bold rule**"]);
    }

    #[test]
    fn label_prefix_is_checked_after_trim() {
        let rules = parse_critical_block("@USER_CRITICAL\n   CRITICAL: label\n- a\n");
        assert_eq!(texts(&rules), vec!["- a"]);
    }

    #[test]
    fn capture_runs_to_end_of_file() {
        let rules = parse_critical_block("intro\n@USER_CRITICAL\n- last rule");
        assert_eq!(texts(&rules), vec!["- last rule"]);
    }

    #[test]
    fn no_marker_yields_nothing() {
        assert!(parse_critical_block("# Title\n- not a rule").is_empty());
        assert!(parse_critical_block("").is_empty());
    }

    #[test]
    fn only_first_block_is_honored() {
        let content = "@USER_CRITICAL\n- first\n# End\n@USER_CRITICAL\n- second\n";
        assert_eq!(texts(&parse_critical_block(content)), vec!["- first"]);
    }

    #[test]
    fn repeated_marker_inside_block_is_skipped() {
        let content = "@USER_CRITICAL\n- a\n# @USER_CRITICAL again\n- b\n# End";
        assert_eq!(texts(&parse_critical_block(content)), vec!["- a", "- b"]);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let rules = parse_critical_block("@USER_CRITICAL\r\n- windows rule\r\n# End\r\n");
        assert_eq!(texts(&rules), vec!["- windows rule"]);
    }

    #[test]
    fn standard_layers_global_then_project() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::create_dir_all(home.path().join(".claude")).unwrap();
        fs::write(
            home.path().join(".claude/CLAUDE.md"),
            "@USER_CRITICAL\n- global rule\n",
        )
        .unwrap();
        fs::write(
            project.path().join("CLAUDE.md"),
            "## @USER_CRITICAL\n- project rule\n## Other",
        )
        .unwrap();

        let rules = RuleSources::standard(Some(home.path()), project.path()).extract();
        assert_eq!(texts(&rules), vec!["- global rule", "- project rule"]);
    }

    #[test]
    fn missing_global_does_not_affect_project() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::write(project.path().join("CLAUDE.md"), "@USER_CRITICAL\n- only\n").unwrap();

        let rules = RuleSources::standard(Some(home.path()), project.path()).extract();
        assert_eq!(texts(&rules), vec!["- only"]);
    }

    #[test]
    fn unreadable_project_does_not_affect_global() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::create_dir_all(home.path().join(".claude")).unwrap();
        fs::write(home.path().join(".claude/CLAUDE.md"), "@USER_CRITICAL\n- g\n").unwrap();
        // A directory where the file should be: exists, but cannot be read.
        fs::create_dir_all(project.path().join("CLAUDE.md")).unwrap();

        let rules = RuleSources::standard(Some(home.path()), project.path()).extract();
        assert_eq!(texts(&rules), vec!["- g"]);
    }

    #[test]
    fn invalid_utf8_layer_is_skipped() {
        let project = tempfile::tempdir().unwrap();
        fs::write(project.path().join("CLAUDE.md"), [0xff, 0xfe, 0x00]).unwrap();
        let team = project.path().join("TEAM.md");
        fs::write(&team, "@USER_CRITICAL\n- team rule\n").unwrap();

        let rules = RuleSources::standard(None, project.path())
            .with_candidate(team)
            .extract();
        assert_eq!(texts(&rules), vec!["- team rule"]);
    }

    #[test]
    fn no_home_skips_global_layer() {
        let sources = RuleSources::standard(None, Path::new("/work"));
        assert_eq!(sources.candidates(), &[PathBuf::from("/work/CLAUDE.md")]);
    }
}
