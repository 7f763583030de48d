//! Pluggable game strategy trait.
//!
//! A [`Strategy`] is the decision side of an agent: the engine owns the
//! connection, classification, and lifecycle, and calls into the strategy at
//! the four game boundaries. Only [`Strategy::make_move`] may suspend; the
//! remaining callbacks are synchronous side-effect hooks.
//!
//! Implement the four required methods and the engine handles everything
//! else. The optional hooks have no-op defaults, and [`Strategy::build_response`]
//! defaults to echoing the command's correlation fields with the move under
//! a `guess` key, which matches most game servers.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};
use crate::message::GameMessage;
use crate::stats::GameStats;

/// Read-only view of the engine's game state, handed to every callback.
#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    /// Match identifier captured at game start
    pub match_id: Option<&'a str>,
    /// Game identifier captured at game start
    pub game_id: Option<&'a str>,
    /// This player's identifier
    pub player_id: Option<&'a str>,
    /// Clues accumulated since the last game start, in arrival order
    pub clues: &'a [String],
    /// Live statistics, readable at any time
    pub stats: &'a GameStats,
}

/// A game-playing strategy.
///
/// Required: [`on_game_started`](Self::on_game_started),
/// [`on_clue_received`](Self::on_clue_received),
/// [`make_move`](Self::make_move), [`on_game_ended`](Self::on_game_ended).
#[async_trait]
pub trait Strategy: Send {
    /// Short name used in logs.
    fn name(&self) -> &str {
        "strategy"
    }

    /// Called exactly once per game, right after the game-started
    /// acknowledgment clears the clue accumulator.
    fn on_game_started(&mut self, ctx: &GameContext<'_>, message: &GameMessage);

    /// Called with each newly extracted clue. `ctx.clues` already contains
    /// `clue` as its last element.
    fn on_clue_received(&mut self, ctx: &GameContext<'_>, clue: &str, message: &GameMessage);

    /// Produce a move for a command, or `None` to intentionally skip it.
    ///
    /// May suspend (e.g. awaiting an external model call). The engine
    /// guarantees at most one `make_move` call is in flight per agent; a
    /// command arriving while one is pending is queued, not interleaved.
    /// Errors are logged, reported via [`on_move_error`](Self::on_move_error),
    /// and treated as `None`.
    async fn make_move(
        &mut self,
        ctx: &GameContext<'_>,
        message: &GameMessage,
    ) -> Result<Option<Value>>;

    /// Called exactly once when a result message ends the game.
    fn on_game_ended(&mut self, ctx: &GameContext<'_>, message: &GameMessage);

    /// Acknowledgments with an unrecognized subject land here. No clue or
    /// phase state changes around this call.
    fn on_acknowledgment(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {}

    /// Called after the transport opens, before any message is processed.
    fn on_connected(&mut self) {}

    /// Called once the agent permanently disconnects.
    fn on_disconnected(&mut self) {}

    /// Server-sent error messages are forwarded here.
    fn on_server_error(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {}

    /// Called when [`make_move`](Self::make_move) or response serialization
    /// fails; the command is skipped and the receive loop continues.
    fn on_move_error(&mut self, _error: &AgentError, _message: &GameMessage) {}

    /// Build the wire payload for a move. Returning `None` skips the command
    /// without sending anything.
    ///
    /// The default echoes `matchId`/`gameId`, forwards the command's `otp`
    /// when present, and puts the move under `guess`.
    fn build_response(
        &self,
        ctx: &GameContext<'_>,
        message: &GameMessage,
        game_move: &Value,
    ) -> Option<Value> {
        Some(default_response(ctx, message, game_move))
    }
}

/// The engine's default response payload: correlation fields plus the move
/// under a `guess` key.
pub fn default_response(ctx: &GameContext<'_>, message: &GameMessage, game_move: &Value) -> Value {
    let mut payload = Map::new();

    if let Some(id) = ctx.match_id.or(message.match_id.as_deref()) {
        payload.insert("matchId".into(), Value::String(id.to_string()));
    }
    if let Some(id) = ctx.game_id.or(message.game_id.as_deref()) {
        payload.insert("gameId".into(), Value::String(id.to_string()));
    }
    if let Some(otp) = message.otp() {
        payload.insert("otp".into(), Value::String(otp.to_string()));
    }
    payload.insert("guess".into(), game_move.clone());

    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context<'a>(stats: &'a GameStats, clues: &'a [String]) -> GameContext<'a> {
        GameContext {
            match_id: Some("m1"),
            game_id: Some("g1"),
            player_id: Some("p1"),
            clues,
            stats,
        }
    }

    #[test]
    fn test_default_response_echoes_correlation_fields() {
        let stats = GameStats::default();
        let message =
            GameMessage::classify(r#"{"matchId":"m1","gameId":"g1","command":"guess","otp":"o-7"}"#);
        let payload = default_response(&context(&stats, &[]), &message, &json!("anthropic"));

        assert_eq!(payload["matchId"], "m1");
        assert_eq!(payload["gameId"], "g1");
        assert_eq!(payload["otp"], "o-7");
        assert_eq!(payload["guess"], "anthropic");
    }

    #[test]
    fn test_default_response_without_otp() {
        let stats = GameStats::default();
        let message = GameMessage::classify(r#"{"matchId":"m1","gameId":"g1","command":"move"}"#);
        let payload = default_response(&context(&stats, &[]), &message, &json!({"x": 1, "y": 2}));

        assert!(payload.get("otp").is_none());
        assert_eq!(payload["guess"]["x"], 1);
    }

    #[test]
    fn test_default_response_falls_back_to_message_ids() {
        let stats = GameStats::default();
        let message = GameMessage::classify(r#"{"matchId":"m9","gameId":"g9","command":"guess"}"#);
        let ctx = GameContext {
            match_id: None,
            game_id: None,
            player_id: None,
            clues: &[],
            stats: &stats,
        };
        let payload = default_response(&ctx, &message, &json!("x"));
        assert_eq!(payload["matchId"], "m9");
        assert_eq!(payload["gameId"], "g9");
    }
}
