//! xorchain CLI: play batches of bot games against the engine.
//!
//! Usage:
//!   cargo run --release -- --mode level3 --games 50 --strategy hints
//!   cargo run --release -- --mode level8 --strategy random --save scores.json

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use xorchain_engine::engine::autoplay::{run_autoplay, HintFollower, RandomWalker, Strategy};
use xorchain_engine::modes::config::{load_default_modes, load_modes};
use xorchain_engine::modes::persist::SaveData;

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    /// Follow the solver's hint paths
    Hints,
    /// Random legal moves
    Random,
}

#[derive(Parser)]
#[command(name = "xorchain", about = "Run bot games against the XOR-chain engine")]
struct Cli {
    /// Game mode name (level1..level8 or one defined in the config file)
    #[arg(short, long, default_value = "level1", env = "XORCHAIN_MODE")]
    mode: String,

    /// Base random seed; game i uses seed + i
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of games to play
    #[arg(long, default_value = "20")]
    games: usize,

    /// Move limit per game
    #[arg(long, default_value = "400")]
    max_moves: usize,

    /// Bot strategy
    #[arg(long, value_enum, default_value = "hints")]
    strategy: StrategyKind,

    /// Path to xorchain.toml (default: auto-discover)
    #[arg(long, env = "XORCHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Save file to record the best score in
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();

    let modes_file = match &cli.config {
        Some(path) => load_modes(path)?,
        None => load_default_modes(),
    };
    let registry = modes_file.to_registry()?;
    let solver = modes_file.solver_config()?;
    let mode = registry.get(&cli.mode).ok_or_else(|| {
        format!(
            "unknown mode '{}', available: {:?}",
            cli.mode,
            registry.list_names()
        )
    })?;

    let strategy: Box<dyn Strategy> = match cli.strategy {
        StrategyKind::Hints => Box::new(HintFollower { prefer: None }),
        StrategyKind::Random => Box::new(RandomWalker::default()),
    };

    eprintln!(
        "Autoplay: {} games, mode={} ({}-bit, max {} bits), seed={}, max_moves={}",
        cli.games, mode.name, mode.width, mode.max_bits, cli.seed, cli.max_moves
    );
    let result = run_autoplay(mode, &solver, strategy.as_ref(), cli.games, cli.seed, cli.max_moves);
    println!("{}", result.summary());

    if let Some(path) = &cli.save {
        let mut save = SaveData::load(path)?;
        save.set_game_mode(&registry, &mode.name);
        if save.record_high_score(&mode.name, result.best_score()) {
            println!("  New high score for {}: {}", mode.name, result.best_score());
        }
        save.save(path)?;
        tracing::info!(path = %path.display(), "save data written");
    }

    Ok(())
}
