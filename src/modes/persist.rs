//! Save data: the selected game mode and per-mode high scores, kept as a
//! flat key to integer map serialized as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ModeRegistry;

const GAME_MODE_PREFIX: &str = "game_mode.";
const HIGH_SCORE_PREFIX: &str = "high_score.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveData {
    entries: BTreeMap<String, i32>,
}

impl SaveData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read save data. A missing file yields empty data.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no save file, starting fresh");
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to encode save data: {}", e))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: i32) {
        self.entries.insert(key.to_string(), value);
    }

    /// Name of the last selected mode, if it is still in `registry`.
    /// The selection is stored as a `game_mode.<name>` flag, so modes added
    /// to the registry later never change what an existing save resolves to.
    pub fn game_mode(&self, registry: &ModeRegistry) -> Option<String> {
        self.entries
            .iter()
            .filter(|(_, v)| **v != 0)
            .filter_map(|(k, _)| k.strip_prefix(GAME_MODE_PREFIX))
            .find(|name| registry.get(name).is_some())
            .map(str::to_string)
    }

    pub fn set_game_mode(&mut self, registry: &ModeRegistry, name: &str) {
        if registry.get(name).is_none() {
            tracing::warn!(mode = name, "not saving unknown game mode");
            return;
        }
        self.entries.retain(|k, _| !k.starts_with(GAME_MODE_PREFIX));
        self.set(&format!("{GAME_MODE_PREFIX}{name}"), 1);
    }

    pub fn high_score(&self, mode: &str) -> i32 {
        self.get(&format!("{HIGH_SCORE_PREFIX}{mode}")).unwrap_or(0)
    }

    /// Store `score` if it beats the current high score. Returns whether it did.
    pub fn record_high_score(&mut self, mode: &str, score: i32) -> bool {
        if score <= self.high_score(mode) {
            return false;
        }
        self.set(&format!("{HIGH_SCORE_PREFIX}{mode}"), score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::GameMode;

    #[test]
    fn test_high_score_only_increases() {
        let mut data = SaveData::new();
        assert_eq!(data.high_score("level1"), 0);
        assert!(data.record_high_score("level1", 12));
        assert!(!data.record_high_score("level1", 5));
        assert!(!data.record_high_score("level1", 12));
        assert_eq!(data.high_score("level1"), 12);
        assert_eq!(data.high_score("level2"), 0);
    }

    #[test]
    fn test_game_mode_resolves_through_registry() {
        let registry = ModeRegistry::builtin();
        let mut data = SaveData::new();
        assert_eq!(data.game_mode(&registry), None);
        data.set_game_mode(&registry, "level5");
        assert_eq!(data.game_mode(&registry).as_deref(), Some("level5"));
        data.set_game_mode(&registry, "missing");
        assert_eq!(data.game_mode(&registry).as_deref(), Some("level5"));
    }

    #[test]
    fn test_game_mode_survives_new_modes() {
        let builtin = ModeRegistry::builtin();
        let mut data = SaveData::new();
        data.set_game_mode(&builtin, "level3");
        data.set_game_mode(&builtin, "level2");

        // A custom mode that sorts ahead of every built-in level.
        let mut extended = ModeRegistry::builtin();
        extended.register(GameMode::new("arcade", 4, 2));
        assert_eq!(data.game_mode(&extended).as_deref(), Some("level2"));

        data.set_game_mode(&extended, "arcade");
        assert_eq!(data.game_mode(&extended).as_deref(), Some("arcade"));
        assert_eq!(data.game_mode(&builtin), None);
        assert_eq!(data.get("game_mode.level2"), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        assert_eq!(SaveData::load(&path).unwrap(), SaveData::new());

        let mut data = SaveData::new();
        data.record_high_score("level3", 99);
        data.set_game_mode(&ModeRegistry::builtin(), "level3");
        data.save(&path).unwrap();

        let loaded = SaveData::load(&path).unwrap();
        assert_eq!(loaded, data);
        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["high_score.level3"], 99);
        assert_eq!(raw["game_mode.level3"], 1);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SaveData::load(&path).is_err());
    }
}
