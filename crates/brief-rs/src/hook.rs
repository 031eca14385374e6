//! Boundary types exchanged with the host session runtime.
//!
//! The host invokes the session-start hook with a JSON [`Payload`] and
//! expects a JSON [`HookResult`] back. Both are validated once here so the
//! rest of the crate works with typed values only.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ── Phase ──────────────────────────────────────────────────────────

/// Lifecycle sub-stage at which the session-start hook fires.
///
/// The host fires session start more than once (`clear`, then `compact`);
/// rendering at every stage would duplicate the banner. Only [`Phase::Clear`]
/// is suppressed, so stages added by future hosts still render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Phase {
    /// The `clear` stage. Produces no output.
    Clear,
    /// The `compact` stage.
    Compact,
    /// No phase supplied.
    #[default]
    Unspecified,
    /// Any phase this crate does not know by name.
    Other(String),
}

impl Phase {
    /// Whether a banner should be produced for this phase.
    pub fn renders(&self) -> bool {
        !matches!(self, Self::Clear)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "clear",
            Self::Compact => "compact",
            Self::Unspecified => "",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Phase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "clear" => Self::Clear,
            "compact" => Self::Compact,
            "" => Self::Unspecified,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Phase {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Payload ────────────────────────────────────────────────────────

/// Inbound hook payload. Fields the host sends beyond these are ignored.
///
/// A field that is missing or `null` takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Payload {
    /// Project directory the session runs in.
    #[serde(default = "default_cwd", deserialize_with = "nullable_cwd")]
    pub cwd: PathBuf,
    /// Lifecycle sub-stage.
    #[serde(default, deserialize_with = "nullable_phase")]
    pub phase: Phase,
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

fn nullable_cwd<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
    Ok(Option::<PathBuf>::deserialize(deserializer)?.unwrap_or_else(default_cwd))
}

fn nullable_phase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Phase, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .map(Phase::from)
        .unwrap_or_default())
}

/// The inbound payload was not a JSON object of the expected shape.
#[derive(Debug, Error)]
#[error("invalid hook payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

impl Payload {
    pub fn new(cwd: impl Into<PathBuf>, phase: impl Into<Phase>) -> Self {
        Self {
            cwd: cwd.into(),
            phase: phase.into(),
        }
    }

    /// Parse and validate a payload from the host's JSON.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ── HookResult ─────────────────────────────────────────────────────

/// Outbound hook result.
///
/// Serializes to the host's wire shape:
/// `{"continue": true, "systemMessage": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookResult {
    /// Banner text shown to the user, if any.
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
    /// Whether the host session should continue. Always `true`.
    #[serde(rename = "continue")]
    pub continue_execution: bool,
}

impl HookResult {
    /// Minimal result: continue, no message.
    pub fn proceed() -> Self {
        Self {
            system_message: None,
            continue_execution: true,
        }
    }

    /// Continue and show `message` to the user.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            system_message: Some(message.into()),
            continue_execution: true,
        }
    }

    /// Serialize to the host's JSON shape.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"continue":true}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_clear_is_suppressed() {
        assert!(!Phase::from("clear").renders());
        assert!(Phase::from("compact").renders());
        assert!(Phase::from("").renders());
        assert!(Phase::from("resume").renders());
        assert_eq!(Phase::from("resume"), Phase::Other("resume".into()));
    }

    #[test]
    fn phase_matching_is_exact() {
        assert!(Phase::from("CLEAR").renders());
        assert!(Phase::from(" clear").renders());
    }

    #[test]
    fn payload_defaults_when_fields_missing() {
        let payload = Payload::from_json("{}").unwrap();
        assert_eq!(payload.cwd, PathBuf::from("."));
        assert_eq!(payload.phase, Phase::Unspecified);
    }

    #[test]
    fn payload_null_fields_take_defaults() {
        let payload = Payload::from_json(r#"{"cwd": null, "phase": null}"#).unwrap();
        assert_eq!(payload, Payload::new(".", Phase::Unspecified));
        assert!(payload.phase.renders());

        let payload = Payload::from_json(r#"{"cwd": "/work/app", "phase": null}"#).unwrap();
        assert_eq!(payload, Payload::new("/work/app", Phase::Unspecified));
    }

    #[test]
    fn payload_ignores_unknown_fields() {
        let json = r#"{"cwd": "/work/app", "phase": "clear", "session_id": "abc", "hook_event_name": "SessionStart"}"#;
        let payload = Payload::from_json(json).unwrap();
        assert_eq!(payload.cwd, PathBuf::from("/work/app"));
        assert_eq!(payload.phase, Phase::Clear);
    }

    #[test]
    fn payload_rejects_wrong_shape() {
        assert!(Payload::from_json("[1, 2]").is_err());
        assert!(Payload::from_json(r#"{"phase": 3}"#).is_err());
        assert!(Payload::from_json("not json").is_err());
    }

    #[test]
    fn result_wire_shape() {
        assert_eq!(HookResult::proceed().to_json(), r#"{"continue":true}"#);
        let json: serde_json::Value =
            serde_json::from_str(&HookResult::with_message("hi").to_json()).unwrap();
        assert_eq!(json["continue"], true);
        assert_eq!(json["systemMessage"], "hi");
    }
}
