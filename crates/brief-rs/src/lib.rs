//! Session-start status banner with graceful degradation.
//!
//! `brief-rs` turns a host's session-start hook into a one-glance status
//! banner: user-pinned critical rules, project language, git state,
//! restore checkpoints, spec progress, and release info. Every signal
//! except the language is optional. A slow or broken collaborator drops its
//! section from the banner and never blocks the session.
//!
//! # Getting started
//!
//! ```ignore
//! use brief_rs::prelude::*;
//!
//! let sources = Sources::new(my_language_detector)
//!     .with_git(my_git)
//!     .with_checkpoints(my_checkpoints);
//!
//! let handler = SessionStartHandler::new(sources, BriefConfig::default())
//!     .with_home(home_dir);
//!
//! let payload = Payload::from_json(&stdin)?;
//! let result = handler.handle(&payload).await?;
//! println!("{}", result.to_json());
//! ```
//!
//! # Where to find things
//!
//! - **Host wire types:** [`Payload`](hook::Payload), [`Phase`](hook::Phase),
//!   and [`HookResult`](hook::HookResult) in [`hook`].
//! - **Critical rules:** [`RuleSources`](rules::RuleSources) and the block
//!   grammar in [`rules::parse_critical_block`].
//! - **Plugging in collaborators:** the traits in [`sources`]; bundle them
//!   with [`Sources`](orchestrator::Sources).
//! - **Failure isolation:** [`gather::settle`] and
//!   [`SignalGatherer`](gather::SignalGatherer).
//! - **Banner layout:** [`Banner`](compose::Banner).
//! - **Tuning:** [`BriefConfig`](config::BriefConfig).

pub mod compose;
pub mod config;
pub mod gather;
pub mod handler;
pub mod hook;
pub mod orchestrator;
pub mod prelude;
pub mod rules;
pub mod sources;

pub use compose::Banner;
pub use config::{BannerConfig, BriefConfig, GatherConfig, RulesConfig};
pub use handler::{HandlerError, SessionStartHandler};
pub use hook::{HookResult, Payload, PayloadError, Phase};
pub use orchestrator::{Signals, Sources};
pub use rules::{CriticalRule, RuleSources};
pub use sources::{
    Checkpoint, CheckpointLister, GitInfo, GitInspector, LanguageDetector, SourceError,
    SourceFuture, SpecCounter, SpecProgress, Unconfigured, VersionInfo, VersionLookup,
};
