//! Keyword-matching clue solver.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use gambit_core::{GameContext, GameMessage, Strategy};

/// A rule: if every keyword appears in the combined clue text, answer with
/// `answer`. First matching rule wins.
#[derive(Debug, Clone)]
struct Rule {
    keywords: Vec<String>,
    answer: String,
}

/// Answers clue-based games by scanning accumulated clues for keywords.
///
/// ```
/// use gambit_agents::KeywordStrategy;
///
/// let strategy = KeywordStrategy::new("anthropic")
///     .with_rule(&["claude", "ai"], "anthropic")
///     .with_rule(&["gpt"], "openai");
/// ```
#[derive(Debug, Clone)]
pub struct KeywordStrategy {
    rules: Vec<Rule>,
    fallback: String,
}

impl KeywordStrategy {
    /// Create a strategy that falls back to `fallback` when no rule matches.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Add a rule matching when all `keywords` appear across the clues.
    pub fn with_rule(mut self, keywords: &[&str], answer: impl Into<String>) -> Self {
        self.rules.push(Rule {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: answer.into(),
        });
        self
    }

    /// Preset with rules for the AI-company quiz games.
    pub fn ai_companies() -> Self {
        Self::new("anthropic")
            .with_rule(&["claude", "ai"], "anthropic")
            .with_rule(&["chatgpt"], "openai")
            .with_rule(&["gpt"], "openai")
            .with_rule(&["gemini"], "google")
            .with_rule(&["bard"], "google")
    }

    fn answer_for(&self, clues: &[String]) -> &str {
        let combined = clues.join(" ").to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().all(|k| combined.contains(k.as_str())))
            .map(|rule| rule.answer.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

#[async_trait]
impl Strategy for KeywordStrategy {
    fn name(&self) -> &str {
        "keyword"
    }

    fn on_game_started(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {
        info!("new game, waiting for clues");
    }

    fn on_clue_received(&mut self, ctx: &GameContext<'_>, clue: &str, _message: &GameMessage) {
        debug!(clue, total = ctx.clues.len(), "clue noted");
    }

    async fn make_move(
        &mut self,
        ctx: &GameContext<'_>,
        _message: &GameMessage,
    ) -> gambit_core::Result<Option<Value>> {
        let answer = self.answer_for(ctx.clues);
        info!(answer, clues = ctx.clues.len(), "answering");
        Ok(Some(json!(answer)))
    }

    fn on_game_ended(&mut self, ctx: &GameContext<'_>, message: &GameMessage) {
        info!(
            outcome = ?message.outcome,
            answer = ?message.answer,
            stats = %ctx.stats.summary(),
            "game finished"
        );
    }
}
