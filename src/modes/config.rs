//! Game-mode overrides and solver tuning loaded from TOML.
//!
//! ```toml
//! [solver]
//! max_depth = 24
//! view_half_columns = 3
//!
//! [modes.level2]
//! thinking_frames = 900
//!
//! [modes.zen]
//! width = 4
//! max_bits = 2
//! thinking_frames = 0
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{GameMode, ModeRegistry};
use crate::engine::solver::SolverConfig;

/// Overrides for one mode. Unknown names define new modes and then need
/// `width` and `max_bits`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModeOverride {
    pub width: Option<u32>,
    pub max_bits: Option<u32>,
    pub thinking_frames: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SolverOverride {
    pub max_depth: Option<usize>,
    pub view_half_columns: Option<i32>,
    pub view_half_rows: Option<i32>,
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModesFile {
    #[serde(default)]
    pub modes: HashMap<String, ModeOverride>,
    #[serde(default)]
    pub solver: SolverOverride,
}

impl SolverOverride {
    /// Convert to SolverConfig, using defaults for any unspecified fields.
    pub fn to_solver_config(&self) -> SolverConfig {
        let d = SolverConfig::default();
        SolverConfig {
            max_depth: self.max_depth.unwrap_or(d.max_depth),
            view_half_columns: self.view_half_columns.unwrap_or(d.view_half_columns),
            view_half_rows: self.view_half_rows.unwrap_or(d.view_half_rows),
        }
    }
}

impl ModesFile {
    /// Apply overrides on top of the built-in levels.
    pub fn to_registry(&self) -> Result<ModeRegistry, String> {
        let mut registry = ModeRegistry::builtin();
        let mut names: Vec<&String> = self.modes.keys().collect();
        names.sort();
        for name in names {
            let o = &self.modes[name];
            let base = registry.get(name).cloned();
            let width = o.width.or(base.as_ref().map(|m| m.width));
            let max_bits = o.max_bits.or(base.as_ref().map(|m| m.max_bits));
            let (width, max_bits) = match (width, max_bits) {
                (Some(w), Some(b)) => (w, b),
                _ => return Err(format!("mode '{name}' needs width and max_bits")),
            };
            if width != 4 && width != 8 {
                return Err(format!("mode '{name}': width must be 4 or 8, got {width}"));
            }
            if !(1..=width).contains(&max_bits) {
                return Err(format!("mode '{name}': max_bits must be in 1..={width}, got {max_bits}"));
            }
            let mut mode = GameMode::new(name, width, max_bits);
            mode.thinking_frames = o
                .thinking_frames
                .or(base.as_ref().map(|m| m.thinking_frames))
                .unwrap_or(mode.thinking_frames);
            registry.register(mode);
        }
        Ok(registry)
    }

    pub fn solver_config(&self) -> Result<SolverConfig, String> {
        let config = self.solver.to_solver_config();
        if config.view_half_columns < 0 || config.view_half_rows < 0 {
            return Err("solver viewport extents must not be negative".into());
        }
        let min_depth = config.min_max_depth();
        if config.max_depth < min_depth {
            return Err(format!(
                "solver.max_depth must be at least {min_depth} so the search can reach past the \
                 {}x{} viewport, got {}",
                config.view_half_columns, config.view_half_rows, config.max_depth
            ));
        }
        Ok(config)
    }
}

/// Load mode overrides from a TOML file at the given path.
pub fn load_modes(path: &Path) -> Result<ModesFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Look for `xorchain.toml` in the working directory, its parent, then
/// `/etc/xorchain`. Without one the built-in levels play with default tuning.
pub fn load_default_modes() -> ModesFile {
    let candidates = [
        Path::new("xorchain.toml"),
        Path::new("../xorchain.toml"),
        Path::new("/etc/xorchain/xorchain.toml"),
    ];
    first_modes_file(&candidates).unwrap_or_default()
}

/// First candidate that exists and parses. Broken files are skipped with a
/// warning so a stale system-wide file cannot shadow a good local one.
fn first_modes_file(candidates: &[&Path]) -> Option<ModesFile> {
    for p in candidates.iter().filter(|p| p.exists()) {
        match load_modes(p) {
            Ok(file) => {
                let mut names: Vec<&str> = file.modes.keys().map(String::as_str).collect();
                names.sort_unstable();
                tracing::info!(
                    path = %p.display(),
                    modes = ?names,
                    solver_tuned = file.solver.max_depth.is_some()
                        || file.solver.view_half_columns.is_some()
                        || file.solver.view_half_rows.is_some(),
                    "loaded mode overrides"
                );
                return Some(file);
            }
            Err(e) => tracing::warn!(error = %e, "skipping mode overrides"),
        }
    }
    tracing::info!("no xorchain.toml found, playing built-in levels with default solver tuning");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::autoplay::{run_autoplay, RandomWalker};
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let file: ModesFile = toml::from_str("").unwrap();
        assert_eq!(file.solver_config().unwrap(), SolverConfig::default());
        assert_eq!(file.to_registry().unwrap().list_names().len(), 8);
    }

    #[test]
    fn test_overrides_and_new_modes() {
        let file: ModesFile = toml::from_str(
            r#"
            [solver]
            max_depth = 16

            [modes.level2]
            thinking_frames = 900

            [modes.zen]
            width = 8
            max_bits = 3
            thinking_frames = 0
            "#,
        )
        .unwrap();
        let registry = file.to_registry().unwrap();
        let l2 = registry.get("level2").unwrap();
        assert_eq!((l2.width, l2.max_bits, l2.thinking_frames), (4, 2, 900));
        let zen = registry.get("zen").unwrap();
        assert_eq!((zen.width, zen.max_bits, zen.thinking_frames), (8, 3, 0));
        assert_eq!(file.solver_config().unwrap().max_depth, 16);
        assert_eq!(file.solver_config().unwrap().view_half_rows, 2);
    }

    #[test]
    fn test_new_mode_without_width_rejected() {
        let file: ModesFile = toml::from_str("[modes.custom]\nmax_bits = 2\n").unwrap();
        let err = file.to_registry().err().unwrap();
        assert!(err.contains("custom"));
    }

    #[test]
    fn test_bad_width_rejected() {
        let file: ModesFile = toml::from_str("[modes.odd]\nwidth = 6\nmax_bits = 2\n").unwrap();
        assert!(file.to_registry().is_err());
    }

    #[test]
    fn test_shallow_depth_rejected() {
        for depth in [1, 3, 4] {
            let file: ModesFile = toml::from_str(&format!("[solver]\nmax_depth = {depth}\n")).unwrap();
            let err = file.solver_config().unwrap_err();
            assert!(err.contains("at least 5"), "{err}");
            assert!(err.contains("viewport"), "{err}");
        }
        let file: ModesFile = toml::from_str("[solver]\nmax_depth = 5\n").unwrap();
        assert_eq!(file.solver_config().unwrap().max_depth, 5);
    }

    #[test]
    fn test_depth_floor_follows_viewport() {
        let file: ModesFile =
            toml::from_str("[solver]\nmax_depth = 6\nview_half_columns = 4\n").unwrap();
        assert!(file.solver_config().unwrap_err().contains("at least 7"));
        let file: ModesFile =
            toml::from_str("[solver]\nmax_depth = 7\nview_half_columns = 4\n").unwrap();
        assert!(file.solver_config().is_ok());
    }

    #[test]
    fn test_minimum_depth_plays_without_exhausting_search() {
        let file: ModesFile = toml::from_str("[solver]\nmax_depth = 5\n").unwrap();
        let solver = file.solver_config().unwrap();
        let registry = file.to_registry().unwrap();
        for name in registry.list_names() {
            let mode = registry.get(&name).unwrap();
            let result = run_autoplay(mode, &solver, &RandomWalker::default(), 4, 0, 300);
            assert_eq!(result.games.len(), 4);
        }
    }

    #[test]
    fn test_load_modes_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[modes.level1]\nthinking_frames = 60").unwrap();
        let file = load_modes(f.path()).unwrap();
        assert_eq!(file.modes["level1"].thinking_frames, Some(60));
    }

    #[test]
    fn test_first_modes_file_skips_missing_and_broken() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[modes.level1\n").unwrap();
        std::fs::write(&good, "[modes.level4]\nthinking_frames = 10\n").unwrap();
        let missing = dir.path().join("missing.toml");

        let file = first_modes_file(&[missing.as_path(), broken.as_path(), good.as_path()]).unwrap();
        assert_eq!(file.modes["level4"].thinking_frames, Some(10));
        assert!(first_modes_file(&[missing.as_path(), broken.as_path()]).is_none());
    }

    #[test]
    fn test_load_modes_reports_path() {
        let err = load_modes(Path::new("/nonexistent/xorchain.toml")).unwrap_err();
        assert!(err.contains("/nonexistent/xorchain.toml"));
    }
}
