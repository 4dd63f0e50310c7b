use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of everything a renderer shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub difficulty: Difficulty,
    pub state: GameState,
    pub remaining_mines: isize,
    pub elapsed: u32,
    pub triggered_mine: Option<Coord2>,
    pub cells: Array2<Cell>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            difficulty: board.difficulty(),
            state: board.state(),
            remaining_mines: board.remaining_mines(),
            elapsed: board.elapsed(),
            triggered_mine: board.triggered_mine(),
            cells: board.cells().to_owned(),
        }
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Renderer projection of every cell, row by row.
    pub fn views(&self) -> Array2<CellView> {
        let triggered = self.triggered_mine.map(ToNdIndex::to_nd_index);
        Array2::from_shape_fn(self.cells.dim(), |(row, column)| {
            self.cells[[row, column]].view(self.state, triggered == Some([row, column]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::walled_board;

    #[test]
    fn snapshot_tracks_board() {
        let mut board = walled_board();
        board.reveal((0, 7));
        board.toggle_flag((0, 0));

        let snapshot = board.snapshot();

        assert_eq!(snapshot.size(), (8, 8));
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.remaining_mines, 9);
        assert_eq!(snapshot.cell_at((0, 7)), board.cell_at((0, 7)));
        assert_eq!(snapshot.views()[[0, 0]], CellView::Flagged);
        assert_eq!(snapshot.views()[[0, 7]], CellView::Revealed(0));
        assert_eq!(snapshot.views()[[0, 3]], CellView::Revealed(2));
        assert_eq!(snapshot.cell_at((8, 0)), None);
    }

    #[test]
    fn snapshot_marks_triggered_mine_and_wrong_flags() {
        let mut board = walled_board();
        board.reveal((0, 7));
        board.toggle_flag((3, 0));

        board.reveal((0, 2));
        let views = board.snapshot().views();

        assert_eq!(views[[0, 2]], CellView::Exploded);
        assert_eq!(views[[1, 2]], CellView::Mine);
        assert_eq!(views[[3, 0]], CellView::WrongFlag);
        assert_eq!(views[[3, 1]], CellView::Hidden);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mut board = walled_board();
        board.reveal((0, 7));

        let json = serde_json::to_value(board.snapshot()).unwrap();

        assert_eq!(json["difficulty"], "Beginner");
        assert_eq!(json["state"], "Playing");
        assert_eq!(json["remaining_mines"], 10);
        let restored: BoardSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(restored, board.snapshot());
    }
}
