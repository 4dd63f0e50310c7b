use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: positions are drawn until enough of them are
/// neither the excluded start cell nor already mined.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    rng: SmallRng,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, exclude: Coord2) -> MineLayout {
        let (rows, columns) = config.size;
        let mut layout = MineLayout::empty(config.size);

        if rows == 0 || columns == 0 {
            log::warn!("Cannot place mines on an empty board");
            return layout;
        }

        // the start cell never holds a mine
        let free_cells = config.total_cells() - CellCount::from(in_bounds(exclude, config.size));
        let target = if config.mines > free_cells {
            log::warn!(
                "Minefield too small, requested {} mines but only {} fit",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut attempts: u32 = 0;
        while layout.mine_count() < target {
            attempts += 1;
            let coords = (
                self.rng.random_range(0..rows),
                self.rng.random_range(0..columns),
            );
            if coords == exclude || layout.contains_mine(coords) {
                continue;
            }
            layout.set_mine(coords, true);
        }

        log::debug!(
            "Placed {} mines on {}x{} in {} draws, excluding {:?}",
            layout.mine_count(),
            rows,
            columns,
            attempts,
            exclude
        );
        layout
    }
}
