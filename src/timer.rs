//! Singleton-identity timers for the control thread.
//!
//! Each logical timer in the overlay (key repeat tick, auto-hide
//! deadline, panel transitions) has exactly one slot. Scheduling a slot
//! replaces any previous deadline and cancellation is idempotent, so a
//! slot can never have two outstanding instances. The control loop asks
//! for the earliest deadline, sleeps no longer than that, and then
//! collects the due slots.

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSlot {
    /// Auto-repeat tick while a volume key is held.
    Repeat,
    /// Dismissal deadline for the primary panel.
    AutoHide,
    /// Show/hide transition completion of the primary panel.
    PrimaryTransition,
    /// Exit transition completion of the secondary panel.
    SecondaryTransition,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 4] = [
        TimerSlot::Repeat,
        TimerSlot::AutoHide,
        TimerSlot::PrimaryTransition,
        TimerSlot::SecondaryTransition,
    ];

    fn index(self) -> usize {
        match self {
            TimerSlot::Repeat => 0,
            TimerSlot::AutoHide => 1,
            TimerSlot::PrimaryTransition => 2,
            TimerSlot::SecondaryTransition => 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    deadlines: [Option<Instant>; 4],
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `slot` at `deadline`, replacing any previous deadline.
    pub fn schedule(&mut self, slot: TimerSlot, deadline: Instant) {
        self.deadlines[slot.index()] = Some(deadline);
    }

    /// Disarm `slot`. A no-op when nothing is scheduled.
    pub fn cancel(&mut self, slot: TimerSlot) {
        self.deadlines[slot.index()] = None;
    }

    pub fn scheduled(&self, slot: TimerSlot) -> Option<Instant> {
        self.deadlines[slot.index()]
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }

    /// Disarm and return every slot whose deadline has passed, earliest
    /// deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerSlot> {
        let mut due: Vec<(Instant, TimerSlot)> = Vec::new();
        for slot in TimerSlot::ALL {
            if let Some(deadline) = self.deadlines[slot.index()] {
                if deadline <= now {
                    self.deadlines[slot.index()] = None;
                    due.push((deadline, slot));
                }
            }
        }
        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, slot)| slot).collect()
    }
}
