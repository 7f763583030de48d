//! Constant-answer strategy, mostly useful for smoke tests.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use gambit_core::{GameContext, GameMessage, Strategy};

/// Answers every command with the same move.
#[derive(Debug, Clone)]
pub struct FixedAnswerStrategy {
    answer: Value,
}

impl FixedAnswerStrategy {
    pub fn new(answer: impl Into<Value>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[async_trait]
impl Strategy for FixedAnswerStrategy {
    fn name(&self) -> &str {
        "fixed"
    }

    fn on_game_started(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {}

    fn on_clue_received(&mut self, _ctx: &GameContext<'_>, _clue: &str, _message: &GameMessage) {}

    async fn make_move(
        &mut self,
        _ctx: &GameContext<'_>,
        _message: &GameMessage,
    ) -> gambit_core::Result<Option<Value>> {
        Ok(Some(self.answer.clone()))
    }

    fn on_game_ended(&mut self, _ctx: &GameContext<'_>, message: &GameMessage) {
        info!(outcome = ?message.outcome, "game finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::GameStats;

    #[tokio::test]
    async fn test_always_answers_the_same() {
        let mut strategy = FixedAnswerStrategy::new("crane");
        let stats = GameStats::default();
        let ctx = GameContext {
            match_id: None,
            game_id: None,
            player_id: None,
            clues: &[],
            stats: &stats,
        };
        let message = GameMessage::classify(r#"{"command":"guess"}"#);

        for _ in 0..3 {
            let game_move = strategy.make_move(&ctx, &message).await.unwrap();
            assert_eq!(game_move, Some(serde_json::json!("crane")));
        }
    }
}
