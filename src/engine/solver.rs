//! Solution generator: randomized depth-first search with backpatching.
//!
//! From a spawn point the search discovers two chains, one whose values XOR
//! to zero and one whose values XOR to all-ones. When a branch reaches a
//! target the player cannot have seen yet (synthesized during this search,
//! or beyond the viewport) and that target is not adjacent to the origin,
//! its value is overwritten so that the chain completes there. Since the
//! depth-first descent always leaves the viewport within the depth budget,
//! both chains are always found.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::hex::{Coord, Direction};
use super::tables::{permutations, PERMUTATION_COUNT};

/// Search tuning. The viewport half-extents decide which targets are far
/// enough from the cursor to be rewritten without the player noticing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Longest chain the player may build, cursor included.
    pub max_depth: usize,
    pub view_half_columns: i32,
    pub view_half_rows: i32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 24,
            view_half_columns: 3,
            view_half_rows: 2,
        }
    }
}

impl SolverConfig {
    /// Shortest depth budget that still lets every branch leave the
    /// viewport, where targets can be rewritten. Below this the search can
    /// be boxed in by visible targets and exhaust its budget.
    pub fn min_max_depth(&self) -> usize {
        self.view_half_columns.max(self.view_half_rows).max(0) as usize + 3
    }
}

/// Hint paths, both starting at the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solutions {
    pub zero: Vec<Coord>,
    pub ones: Vec<Coord>,
}

struct Search<'a, R: Rng + ?Sized> {
    grid: &'a mut Grid,
    rng: &'a mut R,
    config: &'a SolverConfig,
    origin: Coord,
    stamp: u32,
    all_ones: u8,
    path: Vec<Coord>,
    zero: Option<Vec<Coord>>,
    ones: Option<Vec<Coord>>,
    forced: u32,
    visited: u32,
}

impl<R: Rng + ?Sized> Search<'_, R> {
    fn done(&self) -> bool {
        self.zero.is_some() && self.ones.is_some()
    }

    /// Visit `coord` with `running` holding the XOR of everything before it
    /// on the current path. Returns true once both chains are found.
    fn visit(&mut self, coord: Coord, running: u8, depth: usize) -> bool {
        let rewritable_cell = coord != self.origin && !self.origin.is_adjacent(coord);
        let outside = coord.outside_view(
            self.origin,
            self.config.view_half_columns,
            self.config.view_half_rows,
        );
        let stamp = self.stamp;

        let target = self.grid.get_or_create(coord, &mut *self.rng);
        if target.visit_stamp == stamp {
            return false;
        }
        target.visit_stamp = stamp;
        self.visited += 1;
        self.path.push(coord);

        if rewritable_cell && !target.is_committed() && (target.birth == stamp || outside) {
            let goal = if self.zero.is_none() { 0 } else { self.all_ones };
            target.set_value(running ^ goal);
            self.forced += 1;
            self.record(goal);
        } else {
            let running = running ^ target.value;
            if running == 0 || running == self.all_ones {
                self.record(running);
            } else if depth + 1 < self.config.max_depth {
                let order = permutations()[self.rng.gen_range(0..PERMUTATION_COUNT)];
                for d in order {
                    let next = coord.neighbor(Direction::from_index(d as usize));
                    if self.visit(next, running, depth + 1) {
                        break;
                    }
                }
            }
        }

        self.path.pop();
        self.done()
    }

    fn record(&mut self, result: u8) {
        let slot = if result == 0 { &mut self.zero } else { &mut self.ones };
        if slot.is_none() {
            *slot = Some(self.path.clone());
        }
    }
}

/// Find one all-zero chain and one all-ones chain starting at `origin`.
///
/// Opens a new grid generation. Panics if the search fails, which would mean
/// the backpatching guarantee was broken.
pub fn find_solutions<R: Rng + ?Sized>(
    grid: &mut Grid,
    origin: Coord,
    config: &SolverConfig,
    rng: &mut R,
) -> Solutions {
    let stamp = grid.begin_generation();
    let all_ones = grid.all_ones();
    let mut search = Search {
        grid,
        rng,
        config,
        origin,
        stamp,
        all_ones,
        path: Vec::with_capacity(config.max_depth),
        zero: None,
        ones: None,
        forced: 0,
        visited: 0,
    };
    search.visit(origin, 0, 0);

    let (zero, ones) = match (search.zero, search.ones) {
        (Some(z), Some(o)) => (z, o),
        (z, o) => panic!(
            "solution search from {origin} exhausted its budget (zero found: {}, ones found: {})",
            z.is_some(),
            o.is_some()
        ),
    };
    tracing::debug!(
        %origin,
        generation = stamp,
        zero_len = zero.len(),
        ones_len = ones.len(),
        forced = search.forced,
        visited = search.visited,
        "found solutions"
    );
    Solutions { zero, ones }
}

#[inline]
fn completes(value: u8, all_ones: u8) -> bool {
    value == 0 || value == all_ones
}

/// True when `origin` alone, or `origin` plus any neighbor, already XORs to
/// zero or all-ones.
pub fn has_trivial_solution<R: Rng + ?Sized>(grid: &mut Grid, origin: Coord, rng: &mut R) -> bool {
    let all_ones = grid.all_ones();
    let neighbor_values = origin.neighbors().map(|n| grid.value_at(n, rng));
    let value = grid.value_at(origin, rng);
    completes(value, all_ones) || neighbor_values.iter().any(|&n| completes(value ^ n, all_ones))
}

/// Perturb the value at `origin` by the smallest offset in 0..16 that leaves
/// no one- or two-target solution at the spawn point. Returns the offset.
///
/// Each neighbor rules out at most two candidates and the origin itself two
/// more, so at least two of the sixteen offsets always survive.
pub fn adjust_spawn_value<R: Rng + ?Sized>(grid: &mut Grid, origin: Coord, rng: &mut R) -> u8 {
    let all_ones = grid.all_ones();
    let neighbor_values = origin.neighbors().map(|n| grid.value_at(n, rng));
    let target = grid.get_or_create(origin, rng);
    let base = target.value;

    for offset in 0..16u8 {
        let candidate = base ^ offset;
        if completes(candidate, all_ones)
            || neighbor_values.iter().any(|&n| completes(candidate ^ n, all_ones))
        {
            continue;
        }
        target.set_value(candidate);
        tracing::debug!(%origin, from = base, to = candidate, offset, "adjusted spawn value");
        return offset;
    }
    panic!("no spawn adjustment available at {origin} (value {base:#x}, neighbors {neighbor_values:?})");
}
