//! Session-start hook binary powered by brief-rs.
//!
//! `brief-hook` wires the brief-rs handler to real collaborators: marker
//! files for the language, the `git` CLI for branch state and checkpoints,
//! a spec directory for progress, and a crates registry for release info.
//!
//! # Library usage
//!
//! ```ignore
//! use brief_hook::HookSettings;
//! use brief_rs::prelude::*;
//!
//! let settings = HookSettings::load(HookSettings::default_path(&cwd));
//! let handler = SessionStartHandler::new(settings.build_sources(), settings.brief.clone());
//! ```
//!
//! # Binary
//!
//! The host pipes the event payload on stdin and reads JSON from stdout:
//!
//! ```sh
//! echo '{"cwd": ".", "phase": "compact"}' | brief-hook
//! ```

pub mod config;
pub mod sources;

pub use config::{HookSettings, SourcesConfig};
pub use sources::{
    GitCheckpoints, GitCli, MarkerLanguageDetector, RegistryVersionLookup, SpecDirectoryCounter,
};
