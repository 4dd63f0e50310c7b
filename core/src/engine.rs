use core::num::Saturating;
use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Playing
/// - Playing -> Won
/// - Playing -> Lost
/// - any -> NotStarted (reset or difficulty change)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Mines not placed yet
    NotStarted,
    /// First cell revealed, clock running
    Playing,
    /// Every safe cell revealed
    Won,
    /// A mine was revealed
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and only a reset is accepted
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// The board state machine.
///
/// Commands never fail: gestures that do not apply (out of bounds, wrong phase, revealed or
/// flagged targets) report `NoChange` and leave the board untouched.
pub struct Board {
    difficulty: Difficulty,
    grid: Array2<Cell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: GameState,
    elapsed: u32,
    triggered_mine: Option<Coord2>,
    timer: Option<TickTimer>,
    generator: Box<dyn MinefieldGenerator + Send>,
    observers: Observers,
}

impl Board {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_generator(difficulty, RandomMinefieldGenerator::from_entropy())
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_generator(difficulty, RandomMinefieldGenerator::new(seed))
    }

    /// Board whose games use the given mine positions.
    pub fn with_mines(difficulty: Difficulty, mine_coords: &[Coord2]) -> Result<Self> {
        let layout = MineLayout::from_mine_coords(difficulty.size(), mine_coords)?;
        if layout.mine_count() != difficulty.mine_count() {
            return Err(GameError::MineCountMismatch {
                expected: difficulty.mine_count(),
                actual: layout.mine_count(),
            });
        }
        Ok(Self::with_generator(
            difficulty,
            PresetMinefieldGenerator::new(layout),
        ))
    }

    pub fn with_generator(
        difficulty: Difficulty,
        generator: impl MinefieldGenerator + Send + 'static,
    ) -> Self {
        Self {
            difficulty,
            grid: Array2::default(difficulty.size().to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: GameState::default(),
            elapsed: 0,
            triggered_mine: None,
            timer: None,
            generator: Box::new(generator),
            observers: Observers::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// `(rows, columns)`
    pub fn size(&self) -> Coord2 {
        grid_size(&self.grid)
    }

    pub fn mine_count(&self) -> CellCount {
        self.difficulty.mine_count()
    }

    /// Mines not flagged yet, negative when more cells are flagged than there are mines.
    ///
    /// Losing unflags every flagged mine as it is revealed, so the count goes up by the number
    /// of correctly flagged mines when the game is lost.
    pub fn remaining_mines(&self) -> isize {
        (self.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    /// Ticks counted while the game was in progress.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.grid.get(coords.to_nd_index()).copied()
    }

    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        self.cell_at(coords)
            .map(|cell| cell.view(self.state, self.triggered_mine == Some(coords)))
    }

    /// Read-only view of the grid, indexed `[row, column]`.
    pub fn cells(&self) -> ArrayView2<'_, Cell> {
        self.grid.view()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(self)
    }

    /// Token of the running clock, `None` unless a game is in progress.
    pub fn tick_token(&self) -> Option<TickToken> {
        self.timer.as_ref().map(TickTimer::token)
    }

    /// Registers `observer` to be called after every command and counted tick.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&BoardEvent, &Board) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.insert(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let outcome = self.reveal_at(coords);
        self.notify(BoardEvent::Revealed { coords, outcome });
        outcome
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let outcome = self.toggle_flag_at(coords);
        self.notify(BoardEvent::FlagToggled { coords, outcome });
        outcome
    }

    /// Discards the current game and starts over at the same difficulty.
    pub fn reset(&mut self) {
        self.clear();
        log::debug!("Board reset to {:?}", self.difficulty);
        self.notify(BoardEvent::Reset);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.clear();
        log::debug!("Difficulty changed to {:?}", difficulty);
        self.notify(BoardEvent::DifficultyChanged(difficulty));
    }

    /// One elapsed-time signal, counted only while a game is in progress.
    pub fn tick(&mut self) -> bool {
        if !matches!(self.state, GameState::Playing) {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        self.notify(BoardEvent::Ticked {
            elapsed: self.elapsed,
        });
        true
    }

    pub(crate) fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn reveal_at(&mut self, coords: Coord2) -> RevealOutcome {
        if self.state.is_final() {
            log::trace!("Ignoring reveal at {:?}, game already ended", coords);
            return RevealOutcome::NoChange;
        }
        if self.state.is_initial() {
            self.start(coords);
        }

        let Some(coords) = self.validate_coords(coords) else {
            log::trace!("Ignoring reveal at {:?}, out of bounds", coords);
            return RevealOutcome::NoChange;
        };

        let cell = self.grid[coords.to_nd_index()];
        if cell.is_revealed || cell.is_flagged {
            return RevealOutcome::NoChange;
        }

        if cell.is_mine {
            self.grid[coords.to_nd_index()].is_revealed = true;
            self.triggered_mine = Some(coords);
            self.lose();
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(coords);

        if self.revealed_count.0 == self.difficulty.config().safe_cell_count() {
            self.win();
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn toggle_flag_at(&mut self, coords: Coord2) -> MarkOutcome {
        if !matches!(self.state, GameState::Playing) {
            return MarkOutcome::NoChange;
        }
        let Some(coords) = self.validate_coords(coords) else {
            return MarkOutcome::NoChange;
        };

        let cell = &mut self.grid[coords.to_nd_index()];
        if cell.is_revealed {
            return MarkOutcome::NoChange;
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        MarkOutcome::Changed
    }

    /// Places the mines around the first revealed cell and starts the clock.
    fn start(&mut self, first: Coord2) {
        let layout = self.generator.generate(self.difficulty.config(), first);

        for coords in layout.iter_mines() {
            self.grid[coords.to_nd_index()].is_mine = true;
        }
        for ((row, column), cell) in self.grid.indexed_iter_mut() {
            if !cell.is_mine {
                cell.adjacent_mines = layout.adjacent_mine_count((row as Coord, column as Coord));
            }
        }

        self.timer = Some(TickTimer::start());
        self.state = GameState::Playing;
        log::debug!(
            "Game started at {:?} with {} mines",
            first,
            layout.mine_count()
        );
    }

    /// Reveals `start` and, through zero cells, the whole connected zero region and its border.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.grid[coords.to_nd_index()];
            // already visited, or protected by a flag
            if cell.is_revealed || cell.is_flagged {
                continue;
            }

            cell.is_revealed = true;
            self.revealed_count += 1;

            if cell.adjacent_mines == 0 {
                let hidden: Vec<_> = self
                    .grid
                    .iter_neighbors(coords)
                    .filter(|&pos| !self.grid[pos.to_nd_index()].is_revealed)
                    .collect();
                log::trace!("Flood-fill from {:?} queues {:?}", coords, hidden);
                to_visit.extend(hidden);
            }
        }
    }

    fn win(&mut self) {
        self.stop_timer();
        self.state = GameState::Won;
        log::debug!("Game won after {} ticks", self.elapsed);
    }

    fn lose(&mut self) {
        self.stop_timer();
        self.state = GameState::Lost;

        for cell in self.grid.iter_mut().filter(|cell| cell.is_mine) {
            if cell.is_flagged {
                cell.is_flagged = false;
                self.flagged_count -= 1;
            }
            cell.is_revealed = true;
        }
        log::debug!(
            "Game lost at {:?} after {} ticks",
            self.triggered_mine,
            self.elapsed
        );
    }

    fn clear(&mut self) {
        self.stop_timer();
        self.grid = Array2::default(self.difficulty.size().to_nd_index());
        self.revealed_count = Saturating(0);
        self.flagged_count = Saturating(0);
        self.state = GameState::NotStarted;
        self.elapsed = 0;
        self.triggered_mine = None;
    }

    fn validate_coords(&self, coords: Coord2) -> Option<Coord2> {
        in_bounds(coords, self.size()).then_some(coords)
    }

    fn notify(&mut self, event: BoardEvent) {
        if self.observers.is_empty() {
            return;
        }
        let mut observers = core::mem::take(&mut self.observers);
        observers.notify(&event, self);
        self.observers = observers;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl core::fmt::Debug for Board {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Board")
            .field("difficulty", &self.difficulty)
            .field("state", &self.state)
            .field("remaining_mines", &self.remaining_mines())
            .field("elapsed", &self.elapsed)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
