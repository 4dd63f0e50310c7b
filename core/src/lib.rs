//! Rule engine for Minesweeper.
//!
//! [`Board`] owns the grid and the game phase; a presentation layer forwards gestures to it
//! (reveal, toggle flag, reset, change difficulty) and reads back state, either by polling
//! [`Board::snapshot`] or by registering an observer with [`Board::subscribe`]. Use
//! [`SharedBoard`] to drive the elapsed-time counter from a tokio runtime or to share a
//! board between threads.

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use observer::*;
pub use shared::*;
pub use snapshot::*;
pub use timer::*;
pub use types::*;

mod cell;
mod difficulty;
mod engine;
mod error;
mod generator;
mod observer;
mod shared;
mod snapshot;
mod timer;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// `(rows, columns)`
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validated config, there must be at least one cell without a mine.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Placement of the mines for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn empty(size: Coord2) -> Self {
        Self {
            mine_mask: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        Self {
            mine_mask,
            mine_count: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        }
    }

    /// Builds a layout from mine positions, duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut layout = Self::empty(size);

        for &coords in mine_coords {
            let coords = layout.validate_coords(coords)?;
            layout.set_mine(coords, true);
        }

        Ok(layout)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.mine_mask)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self.mine_mask
            .get(coords.to_nd_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Positions of all mines in row-major order.
    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|(_, is_mine)| **is_mine)
            .map(|((row, column), _)| (row as Coord, column as Coord))
    }

    pub(crate) fn set_mine(&mut self, coords: Coord2, is_mine: bool) {
        let slot = &mut self.mine_mask[coords.to_nd_index()];
        match (*slot, is_mine) {
            (false, true) => self.mine_count += 1,
            (true, false) => self.mine_count -= 1,
            _ => {}
        }
        *slot = is_mine;
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Outcome of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of revealing a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_full_and_empty_boards() {
        assert_eq!(GameConfig::new((2, 2), 4), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((0, 5), 1), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new((2, 2), 3).unwrap().safe_cell_count(), 1);
    }

    #[test]
    fn layout_counts_distinct_mines() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2), (0, 0)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.game_config().safe_cell_count(), 7);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), vec![(0, 0), (2, 2)]);
    }

    #[test]
    fn layout_rejects_out_of_bounds_mine() {
        let err = MineLayout::from_mine_coords((3, 3), &[(3, 0)]).unwrap_err();

        assert_eq!(err, GameError::InvalidCoords);
    }

    #[test]
    fn adjacent_count_is_grid_clamped() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (0, 1), (2, 2)]).unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 3);
        assert_eq!(layout.adjacent_mine_count((1, 0)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
        assert!(!layout.contains_mine((5, 5)));
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Beginner layout with a wall of mines down column 2 and mines in both left corners.
    ///
    /// Revealing anywhere right of the wall opens all 40 cells there; the left pocket has a
    /// zero region at rows 2..=5 and two isolated safe cells at (0, 1) and (7, 1).
    pub(crate) const WALL_MINES: [Coord2; 10] = [
        (0, 2),
        (1, 2),
        (2, 2),
        (3, 2),
        (4, 2),
        (5, 2),
        (6, 2),
        (7, 2),
        (0, 0),
        (7, 0),
    ];

    pub(crate) fn walled_board() -> Board {
        Board::with_mines(Difficulty::Beginner, &WALL_MINES).unwrap()
    }
}
