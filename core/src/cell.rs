use serde::{Deserialize, Serialize};

use crate::GameState;

/// One square of the board.
///
/// Cells carry no identity beyond their grid position and are only mutated by the
/// [`Board`](crate::Board) that owns them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_revealed: bool,
    pub(crate) is_mine: bool,
    pub(crate) is_flagged: bool,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Mines among the up-to-8 neighbors, valid once mines are placed.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// Projects the cell into what a renderer should draw for it.
    ///
    /// `triggered` marks the mine that ended the game.
    pub const fn view(self, state: GameState, triggered: bool) -> CellView {
        use CellView::*;

        match (self.is_revealed, self.is_flagged, self.is_mine) {
            (true, _, true) if triggered => Exploded,
            (true, _, true) => Mine,
            (true, _, false) => Revealed(self.adjacent_mines),
            (false, true, false) if matches!(state, GameState::Lost) => WrongFlag,
            (false, true, _) => Flagged,
            (false, false, _) => Hidden,
        }
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
    Exploded,
    // only shown after the game is lost:
    WrongFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::WrongFlag)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
