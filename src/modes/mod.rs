pub mod config;
pub mod persist;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::tables::LEVELS;

/// Thinking budget for the built-in modes: one minute at 30 frames per second.
pub const DEFAULT_THINKING_FRAMES: u32 = 1800;

/// A playable difficulty: bit width plus how many bits new targets may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    pub name: String,
    pub width: u32,
    pub max_bits: u32,
    /// Frames the player may spend on one chain. 0 disables the clock.
    #[serde(default)]
    pub thinking_frames: u32,
}

impl GameMode {
    pub fn new(name: &str, width: u32, max_bits: u32) -> Self {
        assert!(width == 4 || width == 8, "unsupported bit width: {width}");
        assert!(
            (1..=width).contains(&max_bits),
            "max_bits {max_bits} out of range for width {width}"
        );
        Self {
            name: name.to_string(),
            width,
            max_bits,
            thinking_frames: DEFAULT_THINKING_FRAMES,
        }
    }

    pub fn all_ones(&self) -> u8 {
        ((1u32 << self.width) - 1) as u8
    }

    /// Built-in mode `level{n}` for n in 1..=8.
    pub fn level(n: usize) -> Self {
        assert!((1..=LEVELS.len()).contains(&n), "no such level: {n}");
        let (width, max_bits) = LEVELS[n - 1];
        Self::new(&format!("level{n}"), width, max_bits)
    }
}

/// Registry of available game modes.
pub struct ModeRegistry {
    modes: HashMap<String, GameMode>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    /// Registry holding the eight built-in levels.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for n in 1..=LEVELS.len() {
            registry.register(GameMode::level(n));
        }
        registry
    }

    pub fn register(&mut self, mode: GameMode) {
        self.modes.insert(mode.name.clone(), mode);
    }

    pub fn get(&self, name: &str) -> Option<&GameMode> {
        self.modes.get(name)
    }

    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modes.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
