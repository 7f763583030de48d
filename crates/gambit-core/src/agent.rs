//! The game agent lifecycle engine.
//!
//! [`GameAgent`] owns one connection, one strategy, and all per-agent state:
//! the current [`AgentPhase`], the [`GameStats`] recorder, and the clue
//! accumulator. Inbound payloads are classified, routed through the state
//! machine, and dispatched to the strategy callbacks strictly in arrival
//! order, one at a time.
//!
//! The engine also supervises the connection: connect with a deadline, a
//! timed receive loop, and bounded reconnect attempts with backoff on
//! transport faults. Strategy failures never stop the loop; they degrade to
//! a skipped command.

use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::backoff::ReconnectPolicy;
use crate::config::GameConfig;
use crate::error::{AgentError, Result};
use crate::message::{AckKind, GameMessage, MessageKind};
use crate::phase::AgentPhase;
use crate::stats::GameStats;
use crate::strategy::{GameContext, Strategy};
use crate::transport::{Connector, Transport, WsConnector};

/// Clonable handle that shuts an agent down from outside its run loop.
///
/// Triggering it cancels an in-flight move generation (no response is sent
/// afterwards), closes the transport, and makes [`GameAgent::run`] return.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Request shutdown. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Per-agent lifecycle state, owned exclusively by the engine.
#[derive(Debug, Default)]
struct Session {
    phase: AgentPhase,
    stats: GameStats,
    clues: Vec<String>,
    match_id: Option<String>,
    game_id: Option<String>,
    player_id: Option<String>,
}

impl Session {
    fn context(&self) -> GameContext<'_> {
        GameContext {
            match_id: self.match_id.as_deref(),
            game_id: self.game_id.as_deref(),
            player_id: self.player_id.as_deref(),
            clues: &self.clues,
            stats: &self.stats,
        }
    }

    fn set_phase(&mut self, next: AgentPhase) {
        if self.phase == next {
            return;
        }
        if !self.phase.can_transition_to(next) {
            warn!(from = %self.phase, to = %next, "unexpected phase transition");
        }
        debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    /// Reset per-game state for a new game. Cumulative stats are preserved.
    fn begin_game(&mut self, message: &GameMessage) {
        self.clues.clear();
        self.match_id = message.match_id.clone();
        self.game_id = message.game_id.clone();
        self.player_id = message.player_id.clone();
        self.stats.record_game_started();
        self.set_phase(AgentPhase::Playing);
    }
}

/// How one pass of the receive loop ended.
enum LoopEnd {
    /// Server closed or the session finished; do not reconnect.
    Clean,
    /// Shutdown was requested; do not reconnect.
    Cancelled,
    /// Transport fault; the supervisor decides whether to reconnect.
    Fault(AgentError),
}

/// Result of waiting for a pending move generation.
enum Waited {
    Move(Result<Option<Value>>),
    Cancelled,
    Lost(AgentError),
}

/// A game agent: one connection, one strategy, one lifecycle.
pub struct GameAgent<S: Strategy> {
    config: GameConfig,
    policy: ReconnectPolicy,
    strategy: S,
    session: Session,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<S: Strategy> GameAgent<S> {
    /// Create an agent for the given configuration and strategy.
    ///
    /// The reconnect delay defaults to the fixed `config.reconnect_delay`;
    /// use [`with_reconnect_policy`](Self::with_reconnect_policy) for
    /// exponential backoff.
    pub fn new(config: GameConfig, strategy: S) -> Self {
        let policy = ReconnectPolicy::fixed(config.reconnect_delay);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            config,
            policy,
            strategy,
            session: Session::default(),
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Replace the reconnect delay policy.
    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AgentPhase {
        self.session.phase
    }

    /// Statistics recorder; safe to read at any time.
    pub fn stats(&self) -> &GameStats {
        &self.session.stats
    }

    /// Clues accumulated since the last game start.
    pub fn clues(&self) -> &[String] {
        &self.session.clues
    }

    /// The agent's configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Borrow the strategy (e.g. to inspect it after a run).
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Mutably borrow the strategy.
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Handle for shutting this agent down from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Connect over WebSocket and play until the session ends.
    pub async fn run_ws(&mut self) -> Result<()> {
        self.run(&WsConnector).await
    }

    /// Connect and play until the session ends: the server closes after a
    /// final game, shutdown is requested, or reconnect attempts are
    /// exhausted (surfaced as [`AgentError::ReconnectExhausted`]).
    pub async fn run(&mut self, connector: &dyn Connector) -> Result<()> {
        let mut failures: u32 = 0;
        loop {
            if *self.shutdown_rx.borrow() {
                return self.finish(None);
            }

            self.session.set_phase(AgentPhase::Connecting);
            info!(url = %self.config.url, "connecting");
            match connector
                .connect(&self.config.url, self.config.connect_timeout)
                .await
            {
                Ok(mut transport) => {
                    failures = 0;
                    self.session.set_phase(AgentPhase::Connected);
                    info!("connected");
                    self.strategy.on_connected();

                    match self.receive_loop(transport.as_mut()).await {
                        LoopEnd::Clean | LoopEnd::Cancelled => {
                            let _ = transport.close().await;
                            return self.finish(None);
                        }
                        LoopEnd::Fault(err) => {
                            warn!(error = %err, "transport fault");
                            let _ = transport.close().await;
                            self.session.set_phase(AgentPhase::Errored);
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "connect failed");
                    self.session.set_phase(AgentPhase::Errored);
                }
            }

            failures += 1;
            if failures >= self.config.max_reconnect_attempts {
                warn!(attempts = failures, "reconnect attempts exhausted");
                return self.finish(Some(AgentError::ReconnectExhausted { attempts: failures }));
            }

            let delay = self.policy.delay_for_attempt(failures - 1);
            info!(
                attempt = failures,
                max_attempts = self.config.max_reconnect_attempts,
                delay_ms = delay.as_millis() as u64,
                "reconnecting after delay"
            );
            tokio::select! {
                biased;
                _ = self.shutdown_rx.changed() => return self.finish(None),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn finish(&mut self, error: Option<AgentError>) -> Result<()> {
        self.session.set_phase(AgentPhase::Disconnected);
        self.strategy.on_disconnected();
        info!(stats = %self.session.stats.summary(), "agent stopped");
        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Process inbound messages until the session ends or the transport
    /// faults. Events are handled strictly in arrival order.
    async fn receive_loop(&mut self, transport: &mut dyn Transport) -> LoopEnd {
        let mut inbox: VecDeque<String> = VecDeque::new();
        loop {
            let raw = match inbox.pop_front() {
                Some(buffered) => buffered,
                None => {
                    let received = tokio::select! {
                        biased;
                        _ = self.shutdown_rx.changed() => return LoopEnd::Cancelled,
                        r = tokio::time::timeout(self.config.recv_timeout, transport.recv()) => r,
                    };
                    match received {
                        // Quiet periods between games are expected with
                        // keep-alive; anywhere else silence is a fault.
                        Err(_elapsed) => {
                            if self.config.keep_alive
                                && self.session.phase == AgentPhase::Connected
                            {
                                continue;
                            }
                            return LoopEnd::Fault(AgentError::RecvTimeout {
                                timeout: self.config.recv_timeout,
                            });
                        }
                        Ok(Ok(Some(text))) => text,
                        Ok(Ok(None)) => {
                            if self.session.phase == AgentPhase::Playing {
                                return LoopEnd::Fault(AgentError::recv_failed(
                                    "connection closed mid-game",
                                ));
                            }
                            info!("connection closed by server");
                            return LoopEnd::Clean;
                        }
                        Ok(Err(err)) => return LoopEnd::Fault(err),
                    }
                }
            };

            let message = GameMessage::classify(&raw);
            trace!(kind = %message.kind, "inbound message");
            match message.kind {
                MessageKind::Ack => self.handle_ack(&message),
                MessageKind::GameStart => self.begin_game(&message),
                MessageKind::Command => {
                    if let Err(end) = self.dispatch_command(&message, transport, &mut inbox).await {
                        return end;
                    }
                }
                MessageKind::Result => {
                    self.handle_result(&message);
                    if !self.config.keep_alive {
                        return LoopEnd::Clean;
                    }
                    self.session.set_phase(AgentPhase::Connected);
                }
                MessageKind::Error => {
                    warn!(raw = %message.raw, "server error");
                    self.strategy
                        .on_server_error(&self.session.context(), &message);
                }
                MessageKind::Unknown => {
                    debug!(raw = %message.raw, "ignoring unclassified message");
                }
            }
        }
    }

    /// Route an acknowledgment by subject.
    fn handle_ack(&mut self, message: &GameMessage) {
        let Some(subject) = message.ack_for.as_deref() else {
            return;
        };
        match AckKind::parse(subject) {
            AckKind::GameStarted => self.begin_game(message),
            AckKind::MetaData => {
                let Some(clue) = message.clue_text() else {
                    return;
                };
                info!(clue = %clue, "clue received");
                self.session.clues.push(clue.clone());
                self.strategy
                    .on_clue_received(&self.session.context(), &clue, message);
            }
            AckKind::Other(subject) => {
                debug!(subject = %subject, "acknowledgment");
                self.strategy
                    .on_acknowledgment(&self.session.context(), message);
            }
        }
    }

    fn begin_game(&mut self, message: &GameMessage) {
        self.session.begin_game(message);
        info!(game_id = ?self.session.game_id, "game started");
        self.strategy
            .on_game_started(&self.session.context(), message);
    }

    fn handle_result(&mut self, message: &GameMessage) {
        let outcome = message.outcome.unwrap_or_default();
        self.session.stats.record_result(outcome);
        self.session.set_phase(AgentPhase::GameOver);
        info!(
            outcome = %outcome,
            answer = ?message.answer,
            moves = self.session.stats.current_game_moves,
            "game over"
        );
        self.strategy
            .on_game_ended(&self.session.context(), message);
    }

    /// Generate and send at most one move for a command.
    ///
    /// While the strategy is thinking the loop keeps receiving and buffering
    /// into `inbox`, so no inbound event is lost, but a second make_move is
    /// never started: queued commands are serviced after this one resolves.
    async fn dispatch_command(
        &mut self,
        message: &GameMessage,
        transport: &mut dyn Transport,
        inbox: &mut VecDeque<String>,
    ) -> std::result::Result<(), LoopEnd> {
        if self.session.phase != AgentPhase::Playing {
            debug!(
                command = ?message.command,
                phase = %self.session.phase,
                "command outside an active game, ignoring"
            );
            return Ok(());
        }

        let waited = {
            let ctx = self.session.context();
            let mut generation = self.strategy.make_move(&ctx, message);
            loop {
                tokio::select! {
                    biased;
                    _ = self.shutdown_rx.changed() => break Waited::Cancelled,
                    outcome = &mut generation => break Waited::Move(outcome),
                    incoming = transport.recv() => match incoming {
                        Ok(Some(text)) => inbox.push_back(text),
                        Ok(None) => break Waited::Lost(AgentError::recv_failed(
                            "connection closed while a move was pending",
                        )),
                        Err(err) => break Waited::Lost(err),
                    },
                }
            }
        };

        let game_move = match waited {
            Waited::Cancelled => return Err(LoopEnd::Cancelled),
            Waited::Lost(err) => return Err(LoopEnd::Fault(err)),
            Waited::Move(Err(err)) => {
                warn!(
                    error = %err,
                    command = ?message.command,
                    "move generation failed, skipping command"
                );
                self.strategy.on_move_error(&err, message);
                return Ok(());
            }
            Waited::Move(Ok(None)) => {
                debug!(command = ?message.command, "strategy declined to move");
                return Ok(());
            }
            Waited::Move(Ok(Some(game_move))) => game_move,
        };

        let Some(payload) =
            self.strategy
                .build_response(&self.session.context(), message, &game_move)
        else {
            debug!(command = ?message.command, "empty response, command skipped");
            return Ok(());
        };

        let text = match serde_json::to_string(&payload) {
            Ok(text) => text,
            Err(err) => {
                let err = AgentError::ResponseSerialization {
                    message: err.to_string(),
                    source: Some(err),
                };
                warn!(error = %err, "response not sent");
                self.strategy.on_move_error(&err, message);
                return Ok(());
            }
        };

        transport.send(&text).await.map_err(LoopEnd::Fault)?;
        self.session.stats.record_move();
        info!(
            command = ?message.command,
            moves = self.session.stats.current_game_moves,
            "move sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::channel_pair;
    use async_trait::async_trait;
    use serde_json::json;

    #[derive(Default)]
    struct CountingStrategy {
        started: u32,
        clues_seen: Vec<String>,
        moves_requested: u32,
        ended: u32,
    }

    #[async_trait]
    impl Strategy for CountingStrategy {
        fn on_game_started(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {
            self.started += 1;
        }

        fn on_clue_received(&mut self, _ctx: &GameContext<'_>, clue: &str, _message: &GameMessage) {
            self.clues_seen.push(clue.to_string());
        }

        async fn make_move(
            &mut self,
            _ctx: &GameContext<'_>,
            _message: &GameMessage,
        ) -> Result<Option<Value>> {
            self.moves_requested += 1;
            Ok(Some(json!("anthropic")))
        }

        fn on_game_ended(&mut self, _ctx: &GameContext<'_>, _message: &GameMessage) {
            self.ended += 1;
        }
    }

    fn test_agent(keep_alive: bool) -> GameAgent<CountingStrategy> {
        let config = GameConfig::new("ws://test")
            .with_keep_alive(keep_alive)
            .with_recv_timeout(std::time::Duration::from_millis(200));
        GameAgent::new(config, CountingStrategy::default())
    }

    #[tokio::test]
    async fn test_command_before_game_start_is_ignored() {
        let mut agent = test_agent(false);
        let (mut transport, mut remote) = channel_pair();
        agent.session.set_phase(AgentPhase::Connecting);
        agent.session.set_phase(AgentPhase::Connected);

        remote
            .to_agent
            .send(r#"{"command":"guess","otp":"o"}"#.to_string())
            .unwrap();
        drop(remote.to_agent);

        let end = agent.receive_loop(&mut transport).await;
        assert!(matches!(end, LoopEnd::Clean));
        assert_eq!(agent.strategy().moves_requested, 0);
        assert!(remote.from_agent.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_game_start_clears_clues() {
        let mut agent = test_agent(true);
        agent.session.set_phase(AgentPhase::Connecting);
        agent.session.set_phase(AgentPhase::Connected);

        let start = GameMessage::classify(
            r#"{"matchId":"m1","gameId":"g1","type":"ack","ackFor":"game started"}"#,
        );
        let clue = GameMessage::classify(
            r#"{"type":"ack","ackFor":"meta data","ackData":"first clue"}"#,
        );
        agent.handle_ack(&start);
        agent.handle_ack(&clue);
        assert_eq!(agent.clues(), ["first clue"]);

        agent.handle_ack(&start);
        assert!(agent.clues().is_empty());
        assert_eq!(agent.strategy().started, 2);
    }

    #[tokio::test]
    async fn test_unknown_ack_subject_is_a_no_op() {
        let mut agent = test_agent(true);
        agent.session.set_phase(AgentPhase::Connecting);
        agent.session.set_phase(AgentPhase::Connected);

        let start = GameMessage::classify(r#"{"type":"ack","ackFor":"game started"}"#);
        agent.handle_ack(&start);
        let other = GameMessage::classify(
            r#"{"type":"ack","ackFor":"guess received","ackData":"noted"}"#,
        );
        agent.handle_ack(&other);

        assert!(agent.clues().is_empty());
        assert_eq!(agent.phase(), AgentPhase::Playing);
    }

    #[tokio::test]
    async fn test_result_records_stats_and_phase() {
        let mut agent = test_agent(true);
        agent.session.set_phase(AgentPhase::Connecting);
        agent.session.set_phase(AgentPhase::Connected);

        let result = GameMessage::classify(r#"{"type":"result","result":"win"}"#);
        agent.handle_result(&result);

        assert_eq!(agent.phase(), AgentPhase::GameOver);
        assert_eq!(agent.stats().games_played, 1);
        assert_eq!(agent.stats().games_won, 1);
        assert_eq!(agent.strategy().ended, 1);
    }
}
