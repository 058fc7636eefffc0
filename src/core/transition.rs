//! Active-zone selection with a settling delay.
//!
//! Selecting a zone does not switch immediately: the controller enters
//! `Transitioning`, hands out a [`TransitionTicket`], and only applies the
//! switch when the runtime reports that the settling delay for that ticket has
//! elapsed. The latest selection wins; commits for superseded tickets are
//! ignored, so two switches never overlap.

use std::time::Duration;

use crate::core::zones::ZoneId;

/// Time the UI is given to play its exit transition before the switch lands.
pub const SETTLE_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTicket {
    pub target: ZoneId,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning(TransitionTicket),
}

#[derive(Debug)]
pub struct ZoneTransitionController {
    active: ZoneId,
    state: TransitionState,
    generation: u64,
}

impl ZoneTransitionController {
    pub fn new(initial: ZoneId) -> Self {
        Self {
            active: initial,
            state: TransitionState::Idle,
            generation: 0,
        }
    }

    pub fn active(&self) -> ZoneId {
        self.active
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning(_))
    }

    pub fn pending_target(&self) -> Option<ZoneId> {
        match self.state {
            TransitionState::Transitioning(ticket) => Some(ticket.target),
            TransitionState::Idle => None,
        }
    }

    /// Requests a switch to `id`.
    ///
    /// Returns the ticket to commit once the settling delay has elapsed, or
    /// `None` when nothing needs scheduling: `id` is already active (any
    /// pending switch is cancelled) or already the pending target.
    pub fn select_zone(&mut self, id: ZoneId) -> Option<TransitionTicket> {
        match self.state {
            TransitionState::Transitioning(pending) if pending.target == id => None,
            _ if id == self.active => {
                if self.is_transitioning() {
                    self.generation += 1;
                    self.state = TransitionState::Idle;
                }
                None
            }
            _ => {
                self.generation += 1;
                let ticket = TransitionTicket {
                    target: id,
                    generation: self.generation,
                };
                self.state = TransitionState::Transitioning(ticket);
                Some(ticket)
            }
        }
    }

    /// Applies the switch for `ticket` if it is still the pending one.
    pub fn commit(&mut self, ticket: TransitionTicket) -> Option<ZoneId> {
        match self.state {
            TransitionState::Transitioning(pending) if pending == ticket => {
                self.active = pending.target;
                self.state = TransitionState::Idle;
                Some(pending.target)
            }
            _ => None,
        }
    }
}
