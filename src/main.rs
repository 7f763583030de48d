//! gambit - game agent launcher
//!
//! Connects a strategy to a game server and plays until the session ends.
//!
//! ## Usage
//!
//! ```bash
//! # Play with the keyword clue solver against a local server
//! gambit --url ws://localhost:2025
//!
//! # Fixed-answer smoke test with verbose logging
//! gambit --strategy fixed --answer crane -v
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gambit_agents::{FixedAnswerStrategy, KeywordStrategy};
use gambit_core::{GameAgent, GameConfig, LogGuard, Strategy, init_logging};
use tracing::{error, info};

/// gambit game agent launcher.
#[derive(Parser, Debug)]
#[command(name = "gambit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game server URL
    #[arg(short, long, default_value = "ws://localhost:2025")]
    url: String,

    /// Strategy to play with
    #[arg(short, long, value_enum, default_value = "keyword")]
    strategy: StrategyKind,

    /// Fixed answer (only used with --strategy fixed)
    #[arg(long, default_value = "anthropic")]
    answer: String,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = 10)]
    connect_timeout: u64,

    /// Per-receive timeout in seconds
    #[arg(long, default_value_t = 2)]
    recv_timeout: u64,

    /// Close the connection after a single game instead of staying for more
    #[arg(long)]
    no_keep_alive: bool,

    /// Maximum reconnect attempts before giving up
    #[arg(long, default_value_t = 3)]
    max_reconnect_attempts: u32,

    /// Delay between reconnect attempts in seconds
    #[arg(long, default_value_t = 5)]
    reconnect_delay: u64,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.gambit/logs/)
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    /// Keyword clue solver with the AI-company preset
    Keyword,
    /// Answer every command with --answer
    Fixed,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::from(1);
        }
    };

    let config = GameConfig::new(&cli.url)
        .with_connect_timeout(Duration::from_secs(cli.connect_timeout))
        .with_recv_timeout(Duration::from_secs(cli.recv_timeout))
        .with_keep_alive(!cli.no_keep_alive)
        .with_max_reconnect_attempts(cli.max_reconnect_attempts)
        .with_reconnect_delay(Duration::from_secs(cli.reconnect_delay));

    let outcome = match cli.strategy {
        StrategyKind::Keyword => play(config, KeywordStrategy::ai_companies()).await,
        StrategyKind::Fixed => play(config, FixedAnswerStrategy::new(cli.answer.clone())).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "agent failed");
            ExitCode::from(1)
        }
    }
}

fn setup_logging(cli: &Cli) -> anyhow::Result<LogGuard> {
    Ok(init_logging(cli.log_dir.clone(), cli.verbose > 0)?)
}

async fn play<S: Strategy>(config: GameConfig, strategy: S) -> gambit_core::Result<()> {
    let mut agent = GameAgent::new(config, strategy);

    // ctrl-c triggers a clean shutdown, cancelling any pending move
    let handle = agent.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            handle.shutdown();
        }
    });

    let result = agent.run_ws().await;
    info!(stats = %agent.stats().summary(), "session ended");
    result
}
