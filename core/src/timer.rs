use tokio::sync::watch;

/// Cancellable handle for the elapsed-time signal of one game.
///
/// Owned by the [`Board`](crate::Board) while a game is in progress and cancelled when the game
/// is won, lost or reset. Dropping it closes the channel, which tokens also observe as
/// cancellation.
#[derive(Debug)]
pub struct TickTimer {
    cancel: watch::Sender<bool>,
}

impl TickTimer {
    pub(crate) fn start() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { cancel }
    }

    pub fn token(&self) -> TickToken {
        TickToken {
            cancelled: self.cancel.subscribe(),
        }
    }

    pub(crate) fn cancel(self) {
        self.cancel.send_replace(true);
    }
}

/// Observer side of a [`TickTimer`], held by whatever schedules the ticks.
#[derive(Clone, Debug)]
pub struct TickToken {
    cancelled: watch::Receiver<bool>,
}

impl TickToken {
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    /// Resolves once the timer is cancelled or its board is gone.
    pub async fn cancelled(&mut self) {
        loop {
            let cancelled = *self.cancelled.borrow_and_update();
            if cancelled || self.cancelled.changed().await.is_err() {
                return;
            }
        }
    }
}
