//! Bounded recovery from platform-forced pauses
//!
//! Mobile platforms may pause a background video element used for audio even
//! though the user never asked for it. The policy allows exactly one automatic
//! re-assert of play per pause event, after a short fixed delay:
//!
//! ```text
//! Armed --pause--> Scheduled --due--> Attempted --progress--> Armed
//!                     |                   |
//!                   pause (ignored)     pause --> give up
//! ```
//!
//! Any user-initiated transition re-arms the policy and invalidates
//! outstanding tickets.

use std::time::Duration;

/// A scheduled recovery attempt
///
/// The host waits `delay`, then hands the ticket back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryTicket {
    generation: u64,
    delay: Duration,
}

impl RecoveryTicket {
    /// How long to wait before the attempt
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Decision for a forced pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// Schedule one attempt
    Schedule(RecoveryTicket),
    /// An attempt is already pending for this pause event
    AlreadyScheduled,
    /// The attempt was made and playback paused again
    GiveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Armed,
    Scheduled(u64),
    Attempted,
}

/// Single-shot pause recovery policy
#[derive(Debug, Clone)]
pub struct PauseRecovery {
    delay: Duration,
    generation: u64,
    phase: Phase,
}

impl PauseRecovery {
    /// Create a policy with a fixed attempt delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            phase: Phase::Armed,
        }
    }

    /// Delay used for attempts
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The widget paused while the intent is to play
    pub fn on_forced_pause(&mut self) -> PauseOutcome {
        match self.phase {
            Phase::Armed => {
                self.generation += 1;
                self.phase = Phase::Scheduled(self.generation);
                PauseOutcome::Schedule(RecoveryTicket {
                    generation: self.generation,
                    delay: self.delay,
                })
            }
            Phase::Scheduled(_) => PauseOutcome::AlreadyScheduled,
            Phase::Attempted => {
                self.phase = Phase::Armed;
                PauseOutcome::GiveUp
            }
        }
    }

    /// The ticket's delay elapsed
    ///
    /// Returns `true` exactly once per scheduled ticket, and never for a
    /// ticket invalidated by [`reset`](Self::reset).
    pub fn take_due(&mut self, ticket: RecoveryTicket) -> bool {
        if self.phase == Phase::Scheduled(ticket.generation) {
            self.phase = Phase::Attempted;
            true
        } else {
            false
        }
    }

    /// Playback was observed advancing again
    pub fn on_resumed(&mut self) {
        if self.phase == Phase::Attempted {
            self.phase = Phase::Armed;
        }
    }

    /// A user transition happened; forget any pending attempt
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Armed;
    }

    /// Check whether an attempt is waiting for its delay
    pub fn is_scheduled(&self) -> bool {
        matches!(self.phase, Phase::Scheduled(_))
    }
}
