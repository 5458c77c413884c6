//! Chain evaluation and score bookkeeping.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::hex::Coord;

/// Longest streak multiplier.
pub const MAX_MULTIPLIER: u32 = 4;
/// Factor applied for each bonus marker kind present in a chain.
pub const BONUS_FACTOR: i64 = 3;
/// Shortest chain that can complete.
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Which pattern a completed chain reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainResult {
    AllZeros,
    AllOnes,
}

pub fn classify(value: u8, all_ones: u8) -> Option<ChainResult> {
    if value == 0 {
        Some(ChainResult::AllZeros)
    } else if value == all_ones {
        Some(ChainResult::AllOnes)
    } else {
        None
    }
}

/// XOR of all target values along `chain`. Every coordinate must already
/// hold a target.
pub fn xor_of_chain(grid: &Grid, chain: &[Coord]) -> u8 {
    chain.iter().fold(0, |acc, &c| {
        let target = grid
            .get(c)
            .unwrap_or_else(|| panic!("chain coordinate {c} has no target"));
        acc ^ target.value
    })
}

/// Points for one completed chain: `2^(length-3) * multiplier * bonuses`.
pub fn chain_delta(length: usize, multiplier: u32, bonus_a: bool, bonus_b: bool) -> i64 {
    assert!(length >= MIN_CHAIN_LENGTH, "chain of length {length} cannot complete");
    assert!((1..=MAX_MULTIPLIER).contains(&multiplier));
    let base = 1i64 << (length - MIN_CHAIN_LENGTH).min(62);
    let a = if bonus_a { BONUS_FACTOR } else { 1 };
    let b = if bonus_b { BONUS_FACTOR } else { 1 };
    base.saturating_mul(multiplier as i64)
        .saturating_mul(a)
        .saturating_mul(b)
}

/// Breakdown of a single scored chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub result: ChainResult,
    pub length: usize,
    pub multiplier: u32,
    pub bonus_a: bool,
    pub bonus_b: bool,
    /// Points actually added, after saturation.
    pub delta: i32,
}

/// Running score, streak multiplier and completion history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorekeeper {
    pub score: i32,
    pub multiplier: u32,
    pub last_result: Option<ChainResult>,
    pub completed_chains: u32,
}

impl Scorekeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a completed chain and advance the streak.
    pub fn record(&mut self, result: ChainResult, length: usize, bonus_a: bool, bonus_b: bool) -> Completion {
        self.multiplier = if self.last_result == Some(result) {
            (self.multiplier + 1).min(MAX_MULTIPLIER)
        } else {
            1
        };
        let delta = chain_delta(length, self.multiplier, bonus_a, bonus_b);
        let before = self.score;
        self.score = (self.score as i64).saturating_add(delta).min(i32::MAX as i64) as i32;
        self.last_result = Some(result);
        self.completed_chains = self.completed_chains.saturating_add(1);

        Completion {
            result,
            length,
            multiplier: self.multiplier,
            bonus_a,
            bonus_b,
            delta: self.score - before,
        }
    }
}
