//! # gambit-core
//!
//! Lifecycle engine for agents that play turn-based word/puzzle games over a
//! persistent connection to a game server.
//!
//! The engine owns the connection and the game lifecycle; a game plugs in as
//! a [`Strategy`] with four callbacks. Inbound JSON events are classified
//! into [`GameMessage`]s, acknowledgment subjects are extracted
//! automatically (game-started, clues), a strict state machine drives the
//! callbacks, at most one move is ever pending per command, and transport
//! faults are retried with bounded backoff.
//!
//! ## Example
//!
//! ```no_run
//! use gambit_core::{GameAgent, GameConfig, GameContext, GameMessage, Strategy};
//! use async_trait::async_trait;
//! use serde_json::{Value, json};
//!
//! struct Anthropic;
//!
//! #[async_trait]
//! impl Strategy for Anthropic {
//!     fn on_game_started(&mut self, _ctx: &GameContext<'_>, _msg: &GameMessage) {}
//!     fn on_clue_received(&mut self, _ctx: &GameContext<'_>, clue: &str, _msg: &GameMessage) {
//!         tracing::info!(clue, "thinking");
//!     }
//!     async fn make_move(
//!         &mut self,
//!         _ctx: &GameContext<'_>,
//!         _msg: &GameMessage,
//!     ) -> gambit_core::Result<Option<Value>> {
//!         Ok(Some(json!("anthropic")))
//!     }
//!     fn on_game_ended(&mut self, _ctx: &GameContext<'_>, _msg: &GameMessage) {}
//! }
//!
//! # async fn example() -> gambit_core::Result<()> {
//! let config = GameConfig::new("ws://localhost:2025");
//! let mut agent = GameAgent::new(config, Anthropic);
//! agent.run_ws().await?;
//! println!("{}", agent.stats().summary());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod backoff;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod phase;
pub mod stats;
pub mod strategy;
pub mod transport;

// Re-export main types for convenience
pub use agent::{GameAgent, ShutdownHandle};
pub use backoff::ReconnectPolicy;
pub use config::GameConfig;
pub use error::{AgentError, Result};
pub use logging::{LogGuard, init_logging};
pub use message::{AckKind, GameMessage, GameOutcome, MessageKind};
pub use phase::AgentPhase;
pub use stats::GameStats;
pub use strategy::{GameContext, Strategy, default_response};
pub use transport::{ChannelRemote, ChannelTransport, Connector, Transport, WsConnector, channel_pair};
