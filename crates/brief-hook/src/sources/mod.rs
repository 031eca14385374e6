//! Concrete collaborators backed by the filesystem, `git`, and a crates
//! registry.
//!
//! | Collaborator | Signal | Backed by |
//! |--------------|--------|-----------|
//! | [`MarkerLanguageDetector`] | language | marker files in the project root |
//! | [`GitCli`] | git info | `git rev-parse`, `git status`, `git log` |
//! | [`SpecDirectoryCounter`] | spec progress | `<specs_dir>/*/spec.md` front matter |
//! | [`GitCheckpoints`] | checkpoints | `git for-each-ref` on prefixed branches |
//! | [`RegistryVersionLookup`] | version info | crates registry HTTP API |

pub mod checkpoints;
pub mod git;
pub mod language;
pub mod specs;
pub mod version;

pub use checkpoints::GitCheckpoints;
pub use git::GitCli;
pub use language::MarkerLanguageDetector;
pub use specs::SpecDirectoryCounter;
pub use version::RegistryVersionLookup;
