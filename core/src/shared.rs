use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::*;

/// A [`Board`] behind a single mutex, with its clock driven by a tokio task.
///
/// Every operation takes the lock once, so a reveal and its flood fill are never interleaved
/// with another command. Observers run while the lock is held and must not call back into the
/// `SharedBoard`; a lock poisoned by a panicking observer is taken over as is.
#[derive(Debug)]
pub struct SharedBoard {
    board: Arc<Mutex<Board>>,
    tick_period: Duration,
}

impl SharedBoard {
    pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

    pub fn new(board: Board) -> Self {
        Self::with_tick_period(board, Self::DEFAULT_TICK_PERIOD)
    }

    /// Wraps `board`, resuming its clock if a game is already in progress.
    pub fn with_tick_period(board: Board, tick_period: Duration) -> Self {
        let token = board.tick_token();
        let shared = Self {
            board: Arc::new(Mutex::new(board)),
            tick_period,
        };
        if let Some(token) = token {
            shared.spawn_ticker(token);
        }
        shared
    }

    /// Reveals a cell, starting the clock when this begins a game.
    pub fn reveal(&self, coords: Coord2) -> RevealOutcome {
        let mut board = self.lock();
        let starting = board.state().is_initial();
        let outcome = board.reveal(coords);
        if starting {
            if let Some(token) = board.tick_token() {
                self.spawn_ticker(token);
            }
        }
        outcome
    }

    pub fn toggle_flag(&self, coords: Coord2) -> MarkOutcome {
        self.lock().toggle_flag(coords)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        self.lock().set_difficulty(difficulty);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.lock().snapshot()
    }

    pub fn subscribe(
        &self,
        observer: impl FnMut(&BoardEvent, &Board) + Send + 'static,
    ) -> SubscriptionId {
        self.lock().subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().unsubscribe(id)
    }

    /// Runs `f` with the board locked.
    pub fn with<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        lock_board(&self.board)
    }

    fn spawn_ticker(&self, token: TickToken) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run_ticker(
                    Arc::clone(&self.board),
                    token,
                    self.tick_period,
                ));
            }
            Err(err) => {
                log::warn!("No tokio runtime, elapsed time will not advance: {}", err);
            }
        }
    }
}

impl Drop for SharedBoard {
    fn drop(&mut self) {
        self.lock().stop_timer();
    }
}

fn lock_board(board: &Mutex<Board>) -> MutexGuard<'_, Board> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_ticker(board: Arc<Mutex<Board>>, token: TickToken, period: Duration) {
    let mut cancel = token.clone();
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let mut board = lock_board(&board);
                // cancelled while waiting for the lock
                if token.is_cancelled() {
                    break;
                }
                board.tick();
            }
        }
    }
    log::trace!("Ticker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::walled_board;

    #[tokio::test(start_paused = true)]
    async fn clock_runs_while_playing() {
        let shared = SharedBoard::new(walled_board());

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(shared.snapshot().elapsed, 0);

        shared.reveal((0, 7));
        time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(shared.snapshot().elapsed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn wrapping_board_in_play_resumes_clock() {
        let mut board = walled_board();
        board.reveal((0, 7));
        board.tick();

        let shared = SharedBoard::new(board);
        time::sleep(Duration::from_millis(3500)).await;

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.state, GameState::Playing);
        assert_eq!(snapshot.elapsed, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_freezes_on_loss() {
        let shared = SharedBoard::new(walled_board());
        shared.reveal((0, 7));
        time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(shared.reveal((0, 2)), RevealOutcome::HitMine);
        time::sleep(Duration::from_secs(10)).await;

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.state, GameState::Lost);
        assert_eq!(snapshot.elapsed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_old_clock() {
        let shared = SharedBoard::new(walled_board());
        shared.reveal((0, 7));
        time::sleep(Duration::from_millis(1500)).await;

        shared.reset();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(shared.snapshot().elapsed, 0);

        shared.reveal((0, 7));
        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(shared.snapshot().elapsed, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_board_stops_ticker() {
        let shared = SharedBoard::new(walled_board());
        shared.reveal((0, 7));
        let token = shared.with(|board| board.tick_token()).unwrap();

        drop(shared);

        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn observers_receive_ticks() {
        let shared = SharedBoard::new(walled_board());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        shared.subscribe(move |event, _| {
            if let BoardEvent::Ticked { elapsed } = event {
                let _ = tx.send(*elapsed);
            }
        });

        shared.reveal((0, 7));

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[test]
    fn commands_work_without_runtime() {
        let shared = SharedBoard::new(walled_board());

        assert_eq!(shared.reveal((0, 7)), RevealOutcome::Revealed);
        assert_eq!(shared.toggle_flag((3, 0)), MarkOutcome::Changed);
        shared.set_difficulty(Difficulty::Intermediate);

        assert_eq!(shared.with(|board| board.size()), (16, 16));
        assert_eq!(shared.snapshot().state, GameState::NotStarted);
    }
}
