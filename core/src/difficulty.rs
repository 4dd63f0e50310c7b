use serde::{Deserialize, Serialize};

use crate::*;

/// The fixed board presets a player can pick from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    /// Board dimensions as `(rows, columns)`.
    pub const fn size(self) -> Coord2 {
        match self {
            Self::Beginner => (8, 8),
            Self::Intermediate => (16, 16),
            Self::Expert => (24, 24),
        }
    }

    pub const fn mine_count(self) -> CellCount {
        match self {
            Self::Beginner => 10,
            Self::Intermediate => 40,
            Self::Expert => 99,
        }
    }

    pub const fn config(self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_tiers() {
        assert_eq!(Difficulty::Beginner.config().total_cells(), 64);
        assert_eq!(Difficulty::Intermediate.config().total_cells(), 256);
        assert_eq!(Difficulty::Expert.config().total_cells(), 576);
        assert_eq!(Difficulty::Expert.mine_count(), 99);
    }

    #[test]
    fn presets_leave_safe_cells() {
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            assert_eq!(GameConfig::new(config.size, config.mines), Ok(config));
        }
    }
}
