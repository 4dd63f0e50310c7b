use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

/// Source of mine layouts, asked once per game when the first cell is revealed.
pub trait MinefieldGenerator {
    /// Produces a layout of `config.size` with `config.mines` mines, none of them at `exclude`.
    fn generate(&mut self, config: GameConfig, exclude: Coord2) -> MineLayout;
}
