//! Inbound message model and classifier.
//!
//! Every payload received from the game server is normalized into a
//! [`GameMessage`]. Classification is total: any input, including garbage,
//! maps to exactly one [`MessageKind`] and never fails the receive loop.
//! All top-level fields of the payload are preserved in
//! [`GameMessage::game_data`] so strategies can read game-specific state the
//! engine does not interpret.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of an inbound server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// A new game is starting (bare `type: "game start"` marker)
    GameStart,
    /// Server acknowledgment, optionally carrying a subject and payload
    Ack,
    /// Server request requiring exactly one move response
    Command,
    /// Game result (win/loss/timeout/...)
    Result,
    /// Server-reported error
    Error,
    /// Anything unrecognized, including unparseable payloads
    #[default]
    Unknown,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameStart => write!(f, "game_start"),
            Self::Ack => write!(f, "ack"),
            Self::Command => write!(f, "command"),
            Self::Result => write!(f, "result"),
            Self::Error => write!(f, "error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Recognized acknowledgment subjects.
///
/// Unknown subjects map to [`AckKind::Other`] and are forwarded to the
/// generic acknowledgment hook without touching clues or phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckKind {
    /// `ackFor: "game started"`: a new game has begun
    GameStarted,
    /// `ackFor: "meta data"`: clue or metadata delivery
    MetaData,
    /// Any other subject, carried verbatim
    Other(String),
}

impl AckKind {
    /// Map an acknowledgment subject string to its kind.
    pub fn parse(subject: &str) -> Self {
        match subject.to_lowercase().as_str() {
            "game started" => Self::GameStarted,
            "meta data" => Self::MetaData,
            _ => Self::Other(subject.to_string()),
        }
    }
}

/// Outcome reported in a result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Win,
    Loss,
    Timeout,
    Error,
    Abandoned,
    #[default]
    Unknown,
}

impl GameOutcome {
    /// Map a result string to its outcome, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "win" => Self::Win,
            "loss" => Self::Loss,
            "timeout" => Self::Timeout,
            "error" => Self::Error,
            "abandoned" => Self::Abandoned,
            _ => Self::Unknown,
        }
    }

    /// Returns true for outcomes counted as lost games.
    pub fn is_loss(&self) -> bool {
        matches!(self, Self::Loss | Self::Timeout | Self::Abandoned)
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Loss => write!(f, "loss"),
            Self::Timeout => write!(f, "timeout"),
            Self::Error => write!(f, "error"),
            Self::Abandoned => write!(f, "abandoned"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Normalized view of one inbound payload.
#[derive(Debug, Clone, Default)]
pub struct GameMessage {
    /// Original payload text, untouched
    pub raw: String,
    /// Match identifier (`matchId`)
    pub match_id: Option<String>,
    /// Game identifier (`gameId`)
    pub game_id: Option<String>,
    /// This player's identifier (`yourId`)
    pub player_id: Option<String>,
    /// Classified message kind
    pub kind: MessageKind,
    /// Acknowledgment subject; set iff `kind == MessageKind::Ack`
    pub ack_for: Option<String>,
    /// Acknowledgment payload (clue string, metadata object, ...)
    pub ack_data: Option<Value>,
    /// Command name (`"guess"`, `"move"`, ...)
    pub command: Option<String>,
    /// Parsed result outcome; set iff `kind == MessageKind::Result`
    pub outcome: Option<GameOutcome>,
    /// The correct answer, when the server reveals it with a result
    pub answer: Option<String>,
    /// Every top-level field of the payload, preserved verbatim
    pub game_data: Map<String, Value>,
}

impl GameMessage {
    /// Classify a raw payload into a normalized message.
    ///
    /// Total over all inputs: unparseable text yields `MessageKind::Unknown`
    /// with an empty `game_data`; a recognized type marker with invalid
    /// contents yields `MessageKind::Error`.
    pub fn classify(raw: &str) -> Self {
        let data = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                return Self {
                    raw: raw.to_string(),
                    ..Self::default()
                };
            }
        };

        let type_marker = data.get("type").and_then(Value::as_str).map(str::to_lowercase);
        let command = data
            .get("command")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let result_field = data.get("result");

        let mut msg = Self {
            raw: raw.to_string(),
            match_id: field_string(&data, "matchId"),
            game_id: field_string(&data, "gameId"),
            player_id: field_string(&data, "yourId"),
            answer: field_string(&data, "word").or_else(|| field_string(&data, "answer")),
            ..Self::default()
        };

        match type_marker.as_deref() {
            Some("error") => msg.kind = MessageKind::Error,
            Some("ack") => match data.get("ackFor").and_then(Value::as_str) {
                Some(subject) => {
                    msg.kind = MessageKind::Ack;
                    msg.ack_for = Some(subject.to_string());
                    msg.ack_data = data.get("ackData").cloned().filter(|v| !v.is_null());
                }
                // `type: "ack"` without a subject is an invalid ack
                None => msg.kind = MessageKind::Error,
            },
            _ if command.is_some() => {
                msg.kind = MessageKind::Command;
                msg.command = command;
            }
            _ if result_field.is_some() => {
                msg.kind = MessageKind::Result;
                msg.outcome = Some(
                    result_field
                        .and_then(Value::as_str)
                        .map(GameOutcome::parse)
                        .unwrap_or_default(),
                );
            }
            Some("game start") => msg.kind = MessageKind::GameStart,
            _ => msg.kind = MessageKind::Unknown,
        }

        msg.game_data = data;
        msg
    }

    /// Extract the acknowledgment payload as a clue string, if any.
    ///
    /// String payloads are used as-is; structured payloads are serialized to
    /// their JSON text. Empty payloads yield None.
    pub fn clue_text(&self) -> Option<String> {
        match self.ack_data.as_ref()? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The one-time token attached to a command, when present.
    pub fn otp(&self) -> Option<&str> {
        self.game_data.get("otp").and_then(Value::as_str)
    }
}

fn field_string(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ack_with_subject() {
        let msg = GameMessage::classify(
            r#"{"matchId":"m1","gameId":"g1","yourId":"p1","type":"ack","ackFor":"game started","ackData":""}"#,
        );
        assert_eq!(msg.kind, MessageKind::Ack);
        assert_eq!(msg.ack_for.as_deref(), Some("game started"));
        assert_eq!(msg.match_id.as_deref(), Some("m1"));
        // empty ackData carries no clue
        assert_eq!(msg.clue_text(), None);
    }

    #[test]
    fn test_classify_ack_without_subject_is_error() {
        let msg = GameMessage::classify(r#"{"type":"ack"}"#);
        assert_eq!(msg.kind, MessageKind::Error);
        assert!(msg.ack_for.is_none());
    }

    #[test]
    fn test_classify_command() {
        let msg = GameMessage::classify(r#"{"matchId":"m1","command":"guess","otp":"t-9"}"#);
        assert_eq!(msg.kind, MessageKind::Command);
        assert_eq!(msg.command.as_deref(), Some("guess"));
        assert_eq!(msg.otp(), Some("t-9"));
    }

    #[test]
    fn test_empty_command_is_not_a_command() {
        let msg = GameMessage::classify(r#"{"command":""}"#);
        assert_eq!(msg.kind, MessageKind::Unknown);
    }

    #[test]
    fn test_classify_result_with_answer() {
        let msg = GameMessage::classify(r#"{"type":"result","result":"win","word":"crane"}"#);
        assert_eq!(msg.kind, MessageKind::Result);
        assert_eq!(msg.outcome, Some(GameOutcome::Win));
        assert_eq!(msg.answer.as_deref(), Some("crane"));
    }

    #[test]
    fn test_classify_error_beats_other_fields() {
        let msg = GameMessage::classify(r#"{"type":"error","command":"guess","result":"win"}"#);
        assert_eq!(msg.kind, MessageKind::Error);
    }

    #[test]
    fn test_classify_game_start_marker() {
        let msg = GameMessage::classify(r#"{"type":"game start","wordLength":5}"#);
        assert_eq!(msg.kind, MessageKind::GameStart);
    }

    #[test]
    fn test_classify_is_total_on_garbage() {
        for raw in ["", "not json", "[1,2,3]", "42", r#""just a string""#, "{broken"] {
            let msg = GameMessage::classify(raw);
            assert_eq!(msg.kind, MessageKind::Unknown, "input: {raw}");
            assert_eq!(msg.raw, raw);
            assert!(msg.game_data.is_empty());
        }
    }

    #[test]
    fn test_all_fields_preserved_in_game_data() {
        let msg = GameMessage::classify(
            r#"{"command":"guess","wordLength":5,"maxAttempts":6,"lastResult":["x","o"]}"#,
        );
        assert_eq!(msg.game_data.len(), 4);
        assert_eq!(msg.game_data["wordLength"], 5);
        assert_eq!(msg.game_data["lastResult"][1], "o");
    }

    #[test]
    fn test_ack_kind_parse() {
        assert_eq!(AckKind::parse("game started"), AckKind::GameStarted);
        assert_eq!(AckKind::parse("Meta Data"), AckKind::MetaData);
        assert_eq!(
            AckKind::parse("guess received"),
            AckKind::Other("guess received".to_string())
        );
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!(GameOutcome::parse("WIN"), GameOutcome::Win);
        assert_eq!(GameOutcome::parse("timeout"), GameOutcome::Timeout);
        assert_eq!(GameOutcome::parse("whatever"), GameOutcome::Unknown);
        assert!(GameOutcome::Abandoned.is_loss());
        assert!(!GameOutcome::Win.is_loss());
        assert!(!GameOutcome::Error.is_loss());
    }

    #[test]
    fn test_structured_clue_text() {
        let msg = GameMessage::classify(
            r#"{"type":"ack","ackFor":"meta data","ackData":{"hint":"starts with a"}}"#,
        );
        let clue = msg.clue_text().unwrap();
        assert!(clue.contains("starts with a"));
    }
}
