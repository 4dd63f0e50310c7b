use super::*;

/// Replays a fixed layout every game.
///
/// A mine sitting on the first revealed cell moves to the first free cell in row-major order.
/// If the board size or mine count changes the layout no longer applies and placement falls
/// back to random.
#[derive(Clone, Debug)]
pub struct PresetMinefieldGenerator {
    layout: MineLayout,
    fallback: Option<RandomMinefieldGenerator>,
}

impl PresetMinefieldGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self {
            layout,
            fallback: None,
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }
}

impl MinefieldGenerator for PresetMinefieldGenerator {
    fn generate(&mut self, config: GameConfig, exclude: Coord2) -> MineLayout {
        if self.layout.game_config() != config {
            log::warn!(
                "Preset layout {:?} does not fit {:?}, placing mines randomly",
                self.layout.game_config(),
                config
            );
            return self
                .fallback
                .get_or_insert_with(RandomMinefieldGenerator::from_entropy)
                .generate(config, exclude);
        }

        let mut layout = self.layout.clone();
        if layout.contains_mine(exclude) {
            let (rows, columns) = config.size;
            let free = (0..rows)
                .flat_map(|row| (0..columns).map(move |column| (row, column)))
                .find(|&coords| coords != exclude && !layout.contains_mine(coords));

            if let Some(free) = free {
                log::debug!("Moving preset mine from {:?} to {:?}", exclude, free);
                layout.set_mine(exclude, false);
                layout.set_mine(free, true);
            } else {
                log::warn!("No free cell to move the mine at {:?}", exclude);
            }
        }
        layout
    }
}
