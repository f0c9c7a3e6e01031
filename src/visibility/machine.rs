use std::collections::VecDeque;

use thiserror::Error;

const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    Visible,
    /// Toolbar still shown, hide timer armed.
    PendingHide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    PointerEntered,
    PointerLeft,
    HideTimerFired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityTransition {
    pub from: VisibilityState,
    pub event: VisibilityEvent,
    pub to: VisibilityState,
}

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("invalid visibility transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: VisibilityState,
        event: VisibilityEvent,
    },
}

pub type VisibilityResult<T> = std::result::Result<T, VisibilityError>;

#[derive(Debug, Default)]
pub struct VisibilityMachine {
    state: VisibilityState,
    history: VecDeque<VisibilityTransition>,
}

impl VisibilityMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> VisibilityState {
        self.state
    }

    pub fn next_state(&self, event: VisibilityEvent) -> Option<VisibilityState> {
        use VisibilityEvent::*;
        match (self.state, event) {
            (_, PointerEntered) => Some(VisibilityState::Visible),
            (VisibilityState::Visible | VisibilityState::PendingHide, PointerLeft) => {
                Some(VisibilityState::PendingHide)
            }
            (VisibilityState::PendingHide, HideTimerFired) => Some(VisibilityState::Hidden),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: VisibilityEvent) -> VisibilityResult<VisibilityState> {
        let from = self.state;
        let to = self
            .next_state(event)
            .ok_or(VisibilityError::InvalidTransition { from, event })?;
        tracing::debug!(?from, ?event, ?to, "toolbar visibility transition");

        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(VisibilityTransition { from, event, to });
        self.state = to;
        Ok(to)
    }

    /// Most recent transitions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &VisibilityTransition> {
        self.history.iter()
    }
}
