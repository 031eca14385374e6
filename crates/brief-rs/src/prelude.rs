//! Convenience re-exports for hook binaries.
//!
//! ```ignore
//! use brief_rs::prelude::*;
//! ```

pub use crate::config::BriefConfig;
pub use crate::handler::{HandlerError, SessionStartHandler};
pub use crate::hook::{HookResult, Payload, Phase};
pub use crate::orchestrator::{Signals, Sources};
pub use crate::sources::{
    Checkpoint, CheckpointLister, GitInfo, GitInspector, LanguageDetector, SourceError,
    SourceFuture, SpecCounter, SpecProgress, VersionInfo, VersionLookup,
};
