//! Sparse grid store and target factory.
//!
//! Targets are synthesized the first time a coordinate is touched and live
//! until the chain containing them completes. Randomness is consumed in
//! access order, so grid contents depend on traversal order as well as on
//! the seed.

use std::borrow::Cow;
use std::collections::HashMap;

use rand::Rng;

use super::hex::Coord;
use super::tables::bit_table;
use super::target::{Motion, Selection, Target, Variant, PLAIN_VARIATIONS};

/// One in this many zero targets carries bonus marker A (and as many B).
const BONUS_ODDS: u32 = 16;

#[derive(Clone)]
pub struct Grid {
    targets: HashMap<u64, Target>,
    values: Cow<'static, [u8]>,
    width: u32,
    generation: u32,
}

impl Grid {
    pub fn new(width: u32, max_bits: u32) -> Self {
        Self {
            targets: HashMap::new(),
            values: bit_table(width, max_bits),
            width,
            generation: 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bit pattern with every bit of the active width set.
    #[inline]
    pub fn all_ones(&self) -> u8 {
        ((1u32 << self.width) - 1) as u8
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Start a new solver generation and return its stamp.
    pub fn begin_generation(&mut self) -> u32 {
        self.generation += 1;
        self.generation
    }

    pub fn get(&self, coord: Coord) -> Option<&Target> {
        self.targets.get(&coord.pack())
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Target> {
        self.targets.get_mut(&coord.pack())
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.targets.contains_key(&coord.pack())
    }

    /// Return the target at `coord`, synthesizing it on first access.
    pub fn get_or_create<R: Rng + ?Sized>(&mut self, coord: Coord, rng: &mut R) -> &mut Target {
        let values = &self.values;
        let generation = self.generation;
        self.targets.entry(coord.pack()).or_insert_with(|| {
            let target = synthesize(values, generation, rng);
            tracing::trace!(%coord, value = target.value, generation, "synthesized target");
            target
        })
    }

    /// Value at `coord`, synthesizing the target if needed.
    pub fn value_at<R: Rng + ?Sized>(&mut self, coord: Coord, rng: &mut R) -> u8 {
        self.get_or_create(coord, rng).value
    }

    pub fn remove(&mut self, coord: Coord) -> Option<Target> {
        self.targets.remove(&coord.pack())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// All stored coordinates, unordered.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.targets.keys().map(|&k| Coord::unpack(k))
    }
}

fn synthesize<R: Rng + ?Sized>(values: &[u8], generation: u32, rng: &mut R) -> Target {
    let value = values[rng.gen_range(0..values.len())];
    let variant = if value == 0 {
        match rng.gen_range(0..BONUS_ODDS) {
            0 => Variant::BonusA,
            1 => Variant::BonusB,
            _ => Variant::Plain(rng.gen_range(0..PLAIN_VARIATIONS)),
        }
    } else {
        Variant::Plain(rng.gen_range(0..PLAIN_VARIATIONS))
    };
    let motion = match rng.gen_range(0..3) {
        0 => Motion::Still,
        1 => Motion::Drift,
        _ => Motion::Orbit,
    };
    Target {
        value,
        variant,
        motion,
        motion_phase: rng.gen(),
        birth: generation,
        selection: Selection::Unselected,
        visit_stamp: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(4, 4);
        let c = Coord::new(2, -3);
        let first = grid.get_or_create(c, &mut rng).clone();
        let second = grid.get_or_create(c, &mut rng).clone();
        assert_eq!(first, second);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_values_stay_within_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = Grid::new(4, 2);
        for x in -10..10 {
            for y in -10..10 {
                let t = grid.get_or_create(Coord::new(x, y), &mut rng);
                assert!(t.value <= 0xf);
                assert!(t.value.count_ones() <= 2);
            }
        }
        assert_eq!(grid.all_ones(), 0xf);
        assert_eq!(Grid::new(8, 8).all_ones(), 0xff);
    }

    #[test]
    fn test_bonus_markers_only_on_zero() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut grid = Grid::new(8, 1);
        for x in 0..60 {
            for y in 0..60 {
                let t = grid.get_or_create(Coord::new(x, y), &mut rng);
                if t.is_bonus_a() || t.is_bonus_b() {
                    assert_eq!(t.value, 0);
                }
            }
        }
    }

    #[test]
    fn test_birth_tracks_generation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(4, 4);
        let old = grid.get_or_create(Coord::new(0, 0), &mut rng).birth;
        let stamp = grid.begin_generation();
        let fresh = grid.get_or_create(Coord::new(1, 0), &mut rng).birth;
        assert_eq!(fresh, stamp);
        assert!(old < stamp);
    }

    #[test]
    fn test_remove_only_named_coord() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = Grid::new(4, 4);
        grid.get_or_create(Coord::new(0, 0), &mut rng);
        grid.get_or_create(Coord::new(0, 1), &mut rng);
        assert!(grid.remove(Coord::new(0, 0)).is_some());
        assert!(!grid.contains(Coord::new(0, 0)));
        assert!(grid.contains(Coord::new(0, 1)));
        assert!(grid.remove(Coord::new(0, 0)).is_none());
    }
}
