//! Typed update commands sent into a running book workflow.
//!
//! The payload-shape table is encoded in the enum itself: object-style
//! kinds carry a JSON object, choice-style kinds carry a string, and
//! the lifecycle kinds carry nothing. A command that parses is a
//! command whose shape is safe to forward.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// How many characters of the serialized payload to keep in log records.
pub const PAYLOAD_PREVIEW_LEN: usize = 300;

/// A validated update command for one workflow instance.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCommand {
    SetCharacterSpec(Map<String, Value>),
    ChooseCharacter(String),
    SetBookPrefs(Map<String, Value>),
    SelectCover(String),
    Pause,
    Resume,
    Cancel,
}

impl UpdateCommand {
    /// Parse a raw `(type, payload)` pair from the command endpoint.
    ///
    /// Rejects unknown kinds and payloads whose shape does not match
    /// the kind; nothing malformed is ever forwarded to the engine.
    pub fn from_parts(kind: &str, payload: Option<Value>) -> Result<Self, CoreError> {
        match kind {
            "setCharacterSpec" => Ok(Self::SetCharacterSpec(require_object(kind, payload)?)),
            "chooseCharacter" => Ok(Self::ChooseCharacter(require_string(kind, payload)?)),
            "setBookPrefs" => Ok(Self::SetBookPrefs(require_object(kind, payload)?)),
            "selectCover" => Ok(Self::SelectCover(require_string(kind, payload)?)),
            // Lifecycle commands ignore any payload entirely.
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "cancel" => Ok(Self::Cancel),
            other => Err(CoreError::Validation(format!(
                "Unknown command type: {other}"
            ))),
        }
    }

    /// The wire name of this command kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetCharacterSpec(_) => "setCharacterSpec",
            Self::ChooseCharacter(_) => "chooseCharacter",
            Self::SetBookPrefs(_) => "setBookPrefs",
            Self::SelectCover(_) => "selectCover",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Cancel => "cancel",
        }
    }

    /// The engine-side update operation this command maps to.
    ///
    /// Identical to [`kind`](Self::kind) except `selectCover`, which
    /// the engine registered as `chooseCover`. The mismatch predates
    /// this gateway and must be preserved for compatibility with
    /// running workflows.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SelectCover(_) => "chooseCover",
            other => other.kind(),
        }
    }

    /// The payload forwarded with the update, if the kind carries one.
    pub fn args(&self) -> Option<Value> {
        match self {
            Self::SetCharacterSpec(obj) | Self::SetBookPrefs(obj) => {
                Some(Value::Object(obj.clone()))
            }
            Self::ChooseCharacter(s) | Self::SelectCover(s) => Some(Value::String(s.clone())),
            Self::Pause | Self::Resume | Self::Cancel => None,
        }
    }

    /// Size-capped serialized payload for log records.
    pub fn payload_preview(&self) -> String {
        let serialized = match self.args() {
            Some(v) => v.to_string(),
            None => return String::new(),
        };
        serialized.chars().take(PAYLOAD_PREVIEW_LEN).collect()
    }
}

fn require_object(kind: &str, payload: Option<Value>) -> Result<Map<String, Value>, CoreError> {
    match payload {
        Some(Value::Object(obj)) => Ok(obj),
        _ => Err(CoreError::Validation(format!(
            "Command {kind} requires an object payload"
        ))),
    }
}

fn require_string(kind: &str, payload: Option<Value>) -> Result<String, CoreError> {
    match payload {
        Some(Value::String(s)) => Ok(s),
        _ => Err(CoreError::Validation(format!(
            "Command {kind} requires a string payload"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_kinds_accept_objects() {
        let cmd =
            UpdateCommand::from_parts("setCharacterSpec", Some(json!({"species": "fox"}))).unwrap();
        assert_eq!(cmd.kind(), "setCharacterSpec");
        assert_eq!(cmd.args(), Some(json!({"species": "fox"})));
    }

    #[test]
    fn object_kinds_reject_strings() {
        let err = UpdateCommand::from_parts("setCharacterSpec", Some(json!("not-an-object")))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn string_kinds_reject_objects() {
        let err = UpdateCommand::from_parts("chooseCharacter", Some(json!({"id": 3}))).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn string_kinds_reject_missing_payload() {
        let err = UpdateCommand::from_parts("selectCover", None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn lifecycle_kinds_ignore_payload() {
        let cmd = UpdateCommand::from_parts("pause", Some(json!({"whatever": true}))).unwrap();
        assert_eq!(cmd, UpdateCommand::Pause);
        assert_eq!(cmd.args(), None);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = UpdateCommand::from_parts("explodeBook", None).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn select_cover_maps_to_choose_cover() {
        let cmd = UpdateCommand::from_parts("selectCover", Some(json!("cover-3.png"))).unwrap();
        assert_eq!(cmd.operation(), "chooseCover");
        assert_eq!(cmd.kind(), "selectCover");
    }

    #[test]
    fn other_kinds_keep_their_name_as_operation() {
        let cmd = UpdateCommand::from_parts("setBookPrefs", Some(json!({}))).unwrap();
        assert_eq!(cmd.operation(), "setBookPrefs");
    }

    #[test]
    fn payload_preview_is_capped() {
        let big: String = "x".repeat(1000);
        let cmd = UpdateCommand::from_parts("chooseCharacter", Some(json!(big))).unwrap();
        assert_eq!(cmd.payload_preview().len(), PAYLOAD_PREVIEW_LEN);
    }

    #[test]
    fn lifecycle_preview_is_empty() {
        assert_eq!(UpdateCommand::Cancel.payload_preview(), "");
    }
}
