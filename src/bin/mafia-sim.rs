//! mafia-sim - play seeded games of Mafia with random agents.
//!
//! Prints the public story as it happens, then the roles and the outcome.
//! Set `RUST_LOG=mafia_engine=debug` to see the engine's own logs.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mafia_engine::events::{narrate, EventSink, Notification, TracingSink};
use mafia_engine::{GameBuilder, GameConfig, GameOutcome, PlayerId, Simulation};

/// Play a simulated game of Mafia.
#[derive(Debug, Parser)]
#[command(name = "mafia-sim", version, about)]
struct Cli {
    /// Number of players at the table.
    #[arg(short, long, default_value_t = 6)]
    players: usize,

    /// Seed for the role deal and the agents. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file with game rules.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many rounds if nobody has won.
    #[arg(long, default_value_t = 30)]
    max_rounds: u32,
}

/// Prints public notifications as story lines.
struct StorySink;

impl EventSink for StorySink {
    fn publish(&mut self, notification: &Notification) {
        if notification.is_public() {
            println!("{}", narrate(&notification.event));
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.players > config.max_players {
        bail!(
            "{} players do not fit a table of {}",
            cli.players,
            config.max_players
        );
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    let moderator = PlayerId::new(u64::MAX);
    info!(seed, players = cli.players, "starting simulation");

    let game = GameBuilder::new(moderator)
        .config(config)
        .seed(seed)
        .build_with_sink((StorySink, TracingSink))
        .context("building game")?;

    let mut sim = Simulation::new(game, seed, cli.max_rounds);
    sim.seat(cli.players)?;
    let outcome = sim.run()?;

    let game = sim.game();
    println!();
    println!("Seed {seed}, {} rounds.", game.round());
    for participant in game.roster() {
        let role = participant
            .role
            .map_or_else(|| "hidden".to_string(), |role| role.to_string());
        let status = if participant.alive { "alive" } else { "eliminated" };
        println!("  {:<10} {:<12} {status}", participant.id.to_string(), role);
    }

    match outcome {
        GameOutcome::Undecided => println!("No winner after {} rounds.", cli.max_rounds),
        decided => println!("{}", decided.message()),
    }
    Ok(())
}
