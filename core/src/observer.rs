use crate::*;

/// What just happened to a [`Board`], delivered to subscribers after the change is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    Revealed {
        coords: Coord2,
        outcome: RevealOutcome,
    },
    FlagToggled {
        coords: Coord2,
        outcome: MarkOutcome,
    },
    Reset,
    DifficultyChanged(Difficulty),
    Ticked {
        elapsed: u32,
    },
}

impl BoardEvent {
    /// Whether a renderer needs to redraw after this event
    pub const fn has_update(self) -> bool {
        match self {
            Self::Revealed { outcome, .. } => outcome.has_update(),
            Self::FlagToggled { outcome, .. } => outcome.has_update(),
            Self::Reset | Self::DifficultyChanged(_) | Self::Ticked { .. } => true,
        }
    }
}

pub type Observer = Box<dyn FnMut(&BoardEvent, &Board) + Send>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub(crate) fn insert(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls every observer in subscription order.
    pub(crate) fn notify(&mut self, event: &BoardEvent, board: &Board) {
        for (_, observer) in &mut self.entries {
            observer(event, board);
        }
    }
}

impl core::fmt::Debug for Observers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
