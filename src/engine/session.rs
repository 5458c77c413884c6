//! Game session: owns the grid, the chain being built and the score, and
//! applies player moves.
//!
//! A session is always in one of two states. Idle: the chain holds only the
//! cursor, whose value has been adjusted so no one- or two-target chain
//! completes, and fresh hint paths exist. Building: the chain holds two or
//! more targets. Completing a chain removes its targets, scores it and
//! returns to Idle at the chain's last cell.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::hex::{Coord, Direction};
use super::scoring::{classify, xor_of_chain, ChainResult, Completion, Scorekeeper};
use super::solver::{adjust_spawn_value, find_solutions, SolverConfig, Solutions};
use super::target::{Selection, Target};
use crate::modes::GameMode;

/// Result of `advance` or `undo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub accepted: bool,
    pub completion: Option<Completion>,
}

impl MoveOutcome {
    fn rejected() -> Self {
        Self {
            accepted: false,
            completion: None,
        }
    }

    fn accepted() -> Self {
        Self {
            accepted: true,
            completion: None,
        }
    }

    /// Points gained by this move.
    pub fn delta(&self) -> i32 {
        self.completion.map(|c| c.delta).unwrap_or(0)
    }
}

/// Minimal state needed to resume a game: mode and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: String,
    pub score: i32,
    pub completed_chains: u32,
}

#[derive(Clone)]
pub struct Session {
    mode: GameMode,
    solver: SolverConfig,
    grid: Grid,
    rng: StdRng,
    chain: Vec<Coord>,
    hints: Solutions,
    scores: Scorekeeper,
    frames_left: u32,
    over: bool,
}

impl Session {
    pub fn new(mode: GameMode, solver: SolverConfig, seed: u64) -> Self {
        let grid = Grid::new(mode.width, mode.max_bits);
        let mut session = Self {
            mode,
            solver,
            grid,
            rng: StdRng::seed_from_u64(seed),
            chain: Vec::new(),
            hints: Solutions::default(),
            scores: Scorekeeper::new(),
            frames_left: 0,
            over: false,
        };
        session.start_over();
        session
    }

    /// Resume a saved game: a fresh board carrying the saved score.
    pub fn resume(
        mode: GameMode,
        solver: SolverConfig,
        seed: u64,
        snapshot: &SessionSnapshot,
    ) -> Result<Self, String> {
        if snapshot.mode != mode.name {
            return Err(format!(
                "snapshot is for mode '{}', not '{}'",
                snapshot.mode, mode.name
            ));
        }
        let mut session = Self::new(mode, solver, seed);
        session.scores.score = snapshot.score.max(0);
        session.scores.completed_chains = snapshot.completed_chains;
        Ok(session)
    }

    /// Clear the grid, chain and score and start `mode` with a new cursor at
    /// the origin. The random stream carries on from where it was.
    pub fn reset(&mut self, mode: GameMode) {
        self.grid = Grid::new(mode.width, mode.max_bits);
        self.mode = mode;
        self.start_over();
    }

    fn start_over(&mut self) {
        self.grid.clear();
        self.chain.clear();
        self.chain.push(Coord::ORIGIN);
        self.scores = Scorekeeper::new();
        self.frames_left = self.mode.thinking_frames;
        self.over = false;
        tracing::info!(
            mode = %self.mode.name,
            width = self.mode.width,
            max_bits = self.mode.max_bits,
            "new game"
        );
        self.spawn();
    }

    /// Enter Idle at the current cursor: commit its target, remove trivial
    /// solutions and compute new hints.
    fn spawn(&mut self) {
        debug_assert_eq!(self.chain.len(), 1);
        let cursor = self.cursor();
        self.grid.get_or_create(cursor, &mut self.rng).selection = Selection::Committed;
        adjust_spawn_value(&mut self.grid, cursor, &mut self.rng);
        self.hints = find_solutions(&mut self.grid, cursor, &self.solver, &mut self.rng);
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn chain(&self) -> &[Coord] {
        &self.chain
    }

    pub fn cursor(&self) -> Coord {
        *self.chain.last().expect("chain always holds the cursor")
    }

    /// Hint paths as (XOR-to-zero, XOR-to-all-ones), both starting at the
    /// cursor of the last spawn.
    pub fn hint_paths(&self) -> (&[Coord], &[Coord]) {
        (&self.hints.zero, &self.hints.ones)
    }

    pub fn solutions(&self) -> &Solutions {
        &self.hints
    }

    pub fn score(&self) -> i32 {
        self.scores.score
    }

    pub fn completed_chains(&self) -> u32 {
        self.scores.completed_chains
    }

    pub fn last_completed_result(&self) -> Option<ChainResult> {
        self.scores.last_result
    }

    pub fn multiplier(&self) -> u32 {
        self.scores.multiplier
    }

    /// XOR of the chain built so far.
    pub fn chain_xor(&self) -> u8 {
        xor_of_chain(&self.grid, &self.chain)
    }

    pub fn target_at(&self, coord: Coord) -> Option<&Target> {
        self.grid.get(coord)
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn frames_left(&self) -> u32 {
        self.frames_left
    }

    /// Whether `advance(direction)` would be accepted.
    pub fn can_advance(&self, direction: Direction) -> bool {
        if self.over || self.chain.len() >= self.solver.max_depth {
            return false;
        }
        let next = self.cursor().neighbor(direction);
        !self.grid.get(next).map(|t| t.is_committed()).unwrap_or(false)
    }

    /// Extend the chain by one step. Rejected without effect when the chain
    /// is at its length limit, the next target is already in the chain, or
    /// the game is over.
    pub fn advance(&mut self, direction: Direction) -> MoveOutcome {
        if !self.can_advance(direction) {
            tracing::debug!(?direction, cursor = %self.cursor(), "advance rejected");
            return MoveOutcome::rejected();
        }
        let next = self.cursor().neighbor(direction);
        self.grid.get_or_create(next, &mut self.rng).selection = Selection::Committed;
        self.chain.push(next);
        tracing::debug!(?direction, cursor = %next, length = self.chain.len(), "advanced");

        let value = self.chain_xor();
        match classify(value, self.grid.all_ones()) {
            Some(result) => MoveOutcome {
                accepted: true,
                completion: Some(self.complete_chain(result)),
            },
            None => MoveOutcome::accepted(),
        }
    }

    /// Drop the last target of the chain and move the cursor back.
    pub fn undo(&mut self) -> MoveOutcome {
        if self.over || self.chain.len() <= 1 {
            return MoveOutcome::rejected();
        }
        let tip = self.chain.pop().expect("chain longer than one");
        self.grid
            .get_mut(tip)
            .expect("chain targets stay in the grid until completion")
            .selection = Selection::Unselected;
        tracing::debug!(cursor = %self.cursor(), length = self.chain.len(), "undone");
        MoveOutcome::accepted()
    }

    fn complete_chain(&mut self, result: ChainResult) -> Completion {
        let length = self.chain.len();
        let mut bonus_a = false;
        let mut bonus_b = false;
        for &c in &self.chain {
            if let Some(t) = self.grid.get(c) {
                bonus_a |= t.is_bonus_a();
                bonus_b |= t.is_bonus_b();
            }
        }
        let completion = self.scores.record(result, length, bonus_a, bonus_b);

        let tip = self.cursor();
        for c in self.chain.drain(..) {
            self.grid.remove(c);
        }
        self.chain.push(tip);
        self.frames_left = self.mode.thinking_frames;

        tracing::info!(
            ?result,
            length,
            multiplier = completion.multiplier,
            delta = completion.delta,
            score = self.scores.score,
            "chain completed"
        );
        self.spawn();
        completion
    }

    /// Advance the thinking clock by one frame. Returns false once the game
    /// is over.
    pub fn tick(&mut self) -> bool {
        if self.over || self.mode.thinking_frames == 0 {
            return !self.over;
        }
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            self.over = true;
            tracing::info!(score = self.scores.score, chains = self.scores.completed_chains, "thinking time exhausted");
        }
        !self.over
    }

    /// Targets within the viewport around the cursor, synthesizing any that
    /// do not exist yet. Sorted by coordinate.
    pub fn visible_targets(&mut self) -> Vec<(Coord, Target)> {
        let center = self.cursor();
        let (hc, hr) = (self.solver.view_half_columns, self.solver.view_half_rows);
        let mut out = Vec::with_capacity(((2 * hc + 1) * (2 * hr + 1)) as usize);
        for x in (center.x - hc)..=(center.x + hc) {
            for y in (center.y - hr)..=(center.y + hr) {
                let c = Coord::new(x, y);
                out.push((c, self.grid.get_or_create(c, &mut self.rng).clone()));
            }
        }
        out
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode.name.clone(),
            score: self.scores.score,
            completed_chains: self.scores.completed_chains,
        }
    }
}
