//! Spec progress from a directory of `<name>/spec.md` documents.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use brief_rs::sources::{SourceFuture, SpecCounter, SpecProgress};
use tracing::debug;

const SPEC_FILE: &str = "spec.md";
const COMPLETED: &str = "completed";

/// Counts specs under a directory relative to the project root.
///
/// Each subdirectory holding a `spec.md` is one spec. It counts as completed
/// when its front matter carries `status: completed`.
#[derive(Debug, Clone)]
pub struct SpecDirectoryCounter {
    specs_dir: PathBuf,
}

impl SpecDirectoryCounter {
    pub fn new(specs_dir: impl Into<PathBuf>) -> Self {
        Self {
            specs_dir: specs_dir.into(),
        }
    }
}

impl Default for SpecDirectoryCounter {
    fn default() -> Self {
        Self::new(".brief/specs")
    }
}

impl SpecCounter for SpecDirectoryCounter {
    fn count_specs<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, SpecProgress> {
        Box::pin(async move {
            let root = cwd.join(&self.specs_dir);
            let mut entries = match tokio::fs::read_dir(&root).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SpecProgress::default()),
                Err(e) => return Err(e.into()),
            };

            let (mut completed, mut total) = (0, 0);
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_dir() {
                    continue;
                }
                let path = entry.path().join(SPEC_FILE);
                let contents = match tokio::fs::read_to_string(&path).await {
                    Ok(contents) => contents,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => {
                        debug!("Unreadable spec {}: {e}", path.display());
                        total += 1;
                        continue;
                    }
                };
                total += 1;
                if front_matter_status(&contents) == Some(COMPLETED) {
                    completed += 1;
                }
            }

            Ok(SpecProgress::new(completed, total))
        })
    }
}

/// The `status` value from a leading `---` front-matter block.
fn front_matter_status(contents: &str) -> Option<&str> {
    let mut lines = contents.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    lines
        .take_while(|l| l.trim() != "---")
        .find_map(|l| l.trim().strip_prefix("status:"))
        .map(|v| v.trim().trim_matches(|c: char| c == '"' || c == '\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_spec(root: &Path, name: &str, body: &str) {
        let dir = root.join(".brief/specs").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SPEC_FILE), body).unwrap();
    }

    #[test]
    fn front_matter_parsing() {
        assert_eq!(
            front_matter_status("---\nid: A\nstatus: completed\n---\n# A"),
            Some("completed")
        );
        assert_eq!(front_matter_status("---\nstatus: \"draft\"\n---"), Some("draft"));
        assert_eq!(front_matter_status("# no front matter\nstatus: completed"), None);
        assert_eq!(front_matter_status("---\nid: A\n---\nstatus: completed"), None);
        assert_eq!(front_matter_status(""), None);
    }

    #[tokio::test]
    async fn missing_directory_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let progress = SpecDirectoryCounter::default()
            .count_specs(dir.path())
            .await
            .unwrap();
        assert_eq!(progress, SpecProgress::default());
    }

    #[tokio::test]
    async fn counts_completed_specs() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..10 {
            let status = if i < 6 { "completed" } else { "draft" };
            write_spec(dir.path(), &format!("SPEC-{i:03}"), &format!("---\nstatus: {status}\n---\n"));
        }
        // Neither a bare subdirectory nor a stray file is a spec.
        fs::create_dir_all(dir.path().join(".brief/specs/assets")).unwrap();
        fs::write(dir.path().join(".brief/specs/README.md"), "index").unwrap();

        let progress = SpecDirectoryCounter::default()
            .count_specs(dir.path())
            .await
            .unwrap();
        assert_eq!(progress, SpecProgress::new(6, 10));
        assert_eq!(progress.percentage, 60);
    }

    #[tokio::test]
    async fn custom_directory() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("docs/specs/one");
        fs::create_dir_all(&spec).unwrap();
        fs::write(spec.join(SPEC_FILE), "---\nstatus: completed\n---\n").unwrap();

        let progress = SpecDirectoryCounter::new("docs/specs")
            .count_specs(dir.path())
            .await
            .unwrap();
        assert_eq!(progress, SpecProgress::new(1, 1));
        assert_eq!(progress.percentage, 100);
    }
}
