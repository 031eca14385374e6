//! Project language detection from build-system marker files.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use brief_rs::sources::{LanguageDetector, SourceFuture};

/// Reported when no marker file matches.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Marker files in priority order. The first present marker wins.
const MARKERS: &[(&str, &str)] = &[
    ("Cargo.toml", "Rust"),
    ("pyproject.toml", "Python"),
    ("setup.py", "Python"),
    ("requirements.txt", "Python"),
    ("tsconfig.json", "TypeScript"),
    ("package.json", "JavaScript"),
    ("go.mod", "Go"),
    ("pom.xml", "Java"),
    ("build.gradle", "Java"),
    ("build.gradle.kts", "Java"),
    ("Gemfile", "Ruby"),
    ("composer.json", "PHP"),
    ("mix.exs", "Elixir"),
    ("pubspec.yaml", "Dart"),
    ("Package.swift", "Swift"),
    ("CMakeLists.txt", "C++"),
];

/// Detects the language from marker files at the top of the project.
///
/// Fails only when the project directory itself cannot be listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerLanguageDetector;

impl LanguageDetector for MarkerLanguageDetector {
    fn detect_language<'a>(&'a self, cwd: &'a Path) -> SourceFuture<'a, String> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(cwd).await?;
            let mut names = HashSet::new();
            while let Some(entry) = entries.next_entry().await? {
                names.insert(entry.file_name());
            }
            Ok(language_for(&names).to_string())
        })
    }
}

fn language_for(names: &HashSet<OsString>) -> &'static str {
    MARKERS
        .iter()
        .find(|(marker, _)| names.contains(OsStr::new(marker)))
        .map_or(UNKNOWN_LANGUAGE, |&(_, language)| language)
}
