//! Target records stored in the grid.

use serde::{Deserialize, Serialize};

/// Number of plain cosmetic variations a renderer can choose between.
pub const PLAIN_VARIATIONS: u8 = 4;

/// Whether a target is part of the chain currently being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Unselected,
    Committed,
}

/// Appearance variant. Bonus markers only ever sit on zero-valued targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Plain(u8),
    BonusA,
    BonusB,
}

/// Idle animation, cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    Still,
    Drift,
    Orbit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub value: u8,
    pub variant: Variant,
    pub motion: Motion,
    pub motion_phase: u8,
    /// Generation during which this target was synthesized.
    pub birth: u32,
    pub selection: Selection,
    /// Last solver generation that visited this target. 0 means never.
    pub visit_stamp: u32,
}

impl Target {
    pub fn is_committed(&self) -> bool {
        self.selection == Selection::Committed
    }

    /// Overwrite the value, dropping any bonus marker that no longer
    /// sits on a zero.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
        if value != 0 && matches!(self.variant, Variant::BonusA | Variant::BonusB) {
            self.variant = Variant::Plain(0);
        }
    }

    pub fn is_bonus_a(&self) -> bool {
        self.variant == Variant::BonusA
    }

    pub fn is_bonus_b(&self) -> bool {
        self.variant == Variant::BonusB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus_target() -> Target {
        Target {
            value: 0,
            variant: Variant::BonusA,
            motion: Motion::Still,
            motion_phase: 0,
            birth: 1,
            selection: Selection::Unselected,
            visit_stamp: 0,
        }
    }

    #[test]
    fn test_set_value_demotes_bonus() {
        let mut t = bonus_target();
        t.set_value(5);
        assert_eq!(t.value, 5);
        assert_eq!(t.variant, Variant::Plain(0));
    }

    #[test]
    fn test_set_value_zero_keeps_bonus() {
        let mut t = bonus_target();
        t.set_value(0);
        assert!(t.is_bonus_a());
    }
}
