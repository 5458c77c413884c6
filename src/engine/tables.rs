//! Static lookup tables: per-level value candidates and direction orderings.
//!
//! Both tables are built on first use and never change afterwards.

use once_cell::sync::Lazy;

/// One in this many freshly drawn values should be zero, on top of the zeros
/// the value range already contains.
const ODDS_OF_ALL_ZEROES: usize = 13;

/// Number of distinct orderings of the six neighbor directions.
pub const PERMUTATION_COUNT: usize = 720;

/// `(width, max_bits)` for each difficulty level, easiest first.
pub const LEVELS: [(u32, u32); 8] = [
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    (8, 1),
    (8, 2),
    (8, 5),
    (8, 8),
];

static BIT_TABLES: Lazy<Vec<Vec<u8>>> = Lazy::new(|| {
    LEVELS
        .iter()
        .map(|&(width, max_bits)| build_bit_table(width, max_bits))
        .collect()
});

static PERMUTATIONS: Lazy<Vec<[u8; 6]>> = Lazy::new(build_permutations);

/// Candidate values for a level: everything with at most `max_bits` bits set,
/// padded with extra zeros.
pub fn build_bit_table(width: u32, max_bits: u32) -> Vec<u8> {
    assert!(width == 4 || width == 8, "unsupported bit width: {width}");
    let mut values: Vec<u8> = (0..(1u32 << width))
        .filter(|v| v.count_ones() <= max_bits)
        .map(|v| v as u8)
        .collect();
    let zero_padding = values.len() / (ODDS_OF_ALL_ZEROES - 1);
    values.extend(std::iter::repeat(0).take(zero_padding));
    values
}

/// Bit table for a `(width, max_bits)` pair. Pairs from `LEVELS` are served
/// from the shared table; anything else is built on the spot.
pub fn bit_table(width: u32, max_bits: u32) -> std::borrow::Cow<'static, [u8]> {
    match LEVELS.iter().position(|&l| l == (width, max_bits)) {
        Some(i) => std::borrow::Cow::Borrowed(BIT_TABLES[i].as_slice()),
        None => std::borrow::Cow::Owned(build_bit_table(width, max_bits)),
    }
}

/// All orderings of direction indices 0..6, lexicographic.
pub fn permutations() -> &'static [[u8; 6]] {
    &PERMUTATIONS
}

fn build_permutations() -> Vec<[u8; 6]> {
    let mut out = Vec::with_capacity(PERMUTATION_COUNT);
    let mut current = [0u8; 6];
    let mut used = [false; 6];
    permute(0, &mut current, &mut used, &mut out);
    out
}

fn permute(slot: usize, current: &mut [u8; 6], used: &mut [bool; 6], out: &mut Vec<[u8; 6]>) {
    if slot == 6 {
        out.push(*current);
        return;
    }
    for d in 0..6 {
        if used[d] {
            continue;
        }
        used[d] = true;
        current[slot] = d as u8;
        permute(slot + 1, current, used, out);
        used[d] = false;
    }
}
