//! Bot players and batch runs.
//!
//! Bots drive a `Session` through the same `advance`/`undo` calls a player
//! would make, which makes batch runs a cheap end-to-end check of the
//! solver guarantees as well as a way to compare scoring across modes.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::hex::{Coord, Direction};
use super::scoring::ChainResult;
use super::session::Session;
use super::solver::SolverConfig;
use crate::modes::GameMode;

/// Mixed into game seeds so bot decisions draw from a different stream
/// than the session.
const BOT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Advance(Direction),
    Undo,
}

/// A bot strategy picks the next move for a session. `None` means it has
/// nothing to do and the game should stop.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;
    fn choose_move(&self, session: &Session, rng: &mut StdRng) -> Option<Move>;
}

/// Walks one of the hint paths. Backs up first if the chain has strayed
/// from the path.
pub struct HintFollower {
    /// Which path to walk. `None` takes the shorter one.
    pub prefer: Option<ChainResult>,
}

impl HintFollower {
    fn pick<'a>(&self, session: &'a Session) -> &'a [Coord] {
        let (zero, ones) = session.hint_paths();
        match self.prefer {
            Some(ChainResult::AllZeros) => zero,
            Some(ChainResult::AllOnes) => ones,
            None if ones.len() < zero.len() => ones,
            None => zero,
        }
    }
}

impl Strategy for HintFollower {
    fn name(&self) -> &str {
        "hints"
    }

    fn choose_move(&self, session: &Session, _rng: &mut StdRng) -> Option<Move> {
        let path = self.pick(session);
        let chain = session.chain();
        if chain.len() > 1 && !path.starts_with(chain) {
            return Some(Move::Undo);
        }
        let next = *path.get(chain.len())?;
        let cursor = session.cursor();
        Direction::ALL
            .into_iter()
            .find(|&d| cursor.neighbor(d) == next)
            .map(Move::Advance)
    }
}

/// Advances in a uniformly random legal direction, undoing now and then.
pub struct RandomWalker {
    /// One in this many moves is an undo when the chain allows it.
    pub undo_odds: u32,
}

impl Default for RandomWalker {
    fn default() -> Self {
        Self { undo_odds: 6 }
    }
}

impl Strategy for RandomWalker {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&self, session: &Session, rng: &mut StdRng) -> Option<Move> {
        let can_undo = session.chain().len() > 1;
        if can_undo && self.undo_odds > 0 && rng.gen_range(0..self.undo_odds) == 0 {
            return Some(Move::Undo);
        }
        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| session.can_advance(d))
            .collect();
        match legal.choose(rng) {
            Some(&d) => Some(Move::Advance(d)),
            None if can_undo => Some(Move::Undo),
            None => None,
        }
    }
}

/// Outcome of one bot game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub score: i32,
    pub chains: u32,
    pub moves: usize,
    pub timed_out: bool,
    pub duration_ms: f64,
}

/// Aggregated results from a batch of bot games.
#[derive(Debug, Clone, Serialize)]
pub struct AutoplayResult {
    pub mode: String,
    pub strategy: String,
    pub games: Vec<GameRecord>,
}

impl AutoplayResult {
    pub fn avg_score(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.games.iter().map(|g| g.score as f64).sum::<f64>() / self.games.len() as f64
    }

    pub fn score_stddev(&self) -> f64 {
        if self.games.len() < 2 {
            return 0.0;
        }
        let avg = self.avg_score();
        let variance = self
            .games
            .iter()
            .map(|g| (g.score as f64 - avg).powi(2))
            .sum::<f64>()
            / (self.games.len() - 1) as f64;
        variance.sqrt()
    }

    pub fn best_score(&self) -> i32 {
        self.games.iter().map(|g| g.score).max().unwrap_or(0)
    }

    pub fn total_chains(&self) -> u64 {
        self.games.iter().map(|g| g.chains as u64).sum()
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Autoplay Results ({} games, mode={}, strategy={})",
            self.games.len(),
            self.mode,
            self.strategy
        )];
        lines.push("=".repeat(60));
        lines.push(format!(
            "  score: avg={:.1} +/- {:.1}  best={}",
            self.avg_score(),
            self.score_stddev(),
            self.best_score()
        ));
        let moves: usize = self.games.iter().map(|g| g.moves).sum();
        lines.push(format!(
            "  chains: {}  moves: {}  timed out: {}",
            self.total_chains(),
            moves,
            self.games.iter().filter(|g| g.timed_out).count()
        ));
        if !self.games.is_empty() {
            let total_ms: f64 = self.games.iter().map(|g| g.duration_ms).sum();
            lines.push(format!(
                "  Avg game: {:.1}ms  |  Total: {:.2}s",
                total_ms / self.games.len() as f64,
                total_ms / 1000.0
            ));
        }
        lines.join("\n")
    }
}

/// Play `num_games` games of `mode` with `strategy`, in parallel.
/// Game `i` uses seed `base_seed + i`, so results are reproducible.
pub fn run_autoplay(
    mode: &GameMode,
    solver: &SolverConfig,
    strategy: &dyn Strategy,
    num_games: usize,
    base_seed: u64,
    max_moves: usize,
) -> AutoplayResult {
    let games: Vec<GameRecord> = (0..num_games)
        .into_par_iter()
        .map(|i| play_one_game(mode, solver, strategy, base_seed.wrapping_add(i as u64), max_moves))
        .collect();

    AutoplayResult {
        mode: mode.name.clone(),
        strategy: strategy.name().to_string(),
        games,
    }
}

pub fn play_one_game(
    mode: &GameMode,
    solver: &SolverConfig,
    strategy: &dyn Strategy,
    seed: u64,
    max_moves: usize,
) -> GameRecord {
    let t0 = Instant::now();
    let mut session = Session::new(mode.clone(), *solver, seed);
    let mut rng = StdRng::seed_from_u64(seed ^ BOT_SEED_SALT);
    let mut moves = 0;

    while moves < max_moves && session.tick() {
        let outcome = match strategy.choose_move(&session, &mut rng) {
            Some(Move::Advance(d)) => session.advance(d),
            Some(Move::Undo) => session.undo(),
            None => break,
        };
        if !outcome.accepted {
            tracing::warn!(seed, strategy = strategy.name(), "bot chose a rejected move");
            break;
        }
        moves += 1;
    }

    let record = GameRecord {
        seed,
        score: session.score(),
        chains: session.completed_chains(),
        moves,
        timed_out: session.is_over(),
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    };
    tracing::debug!(seed, score = record.score, chains = record.chains, moves, "game finished");
    record
}
