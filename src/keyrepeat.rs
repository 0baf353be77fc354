//! Hardware volume-key handling.
//!
//! Converts raw key-down/key-up events into an immediate adjustment plus
//! a timed auto-repeat stream while the key stays held. The controller
//! owns its own cadence: the input source's native repeat signalling is
//! ignored, so redundant key-downs while already holding are dropped and
//! the repeat timer is never double-scheduled.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::backend::{Direction, VolumeBackend};
use crate::error::VolumeError;
use crate::notifier::EventNotifier;
use crate::stream::Stream;
use crate::timer::{TimerQueue, TimerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    VolumeUp,
    VolumeDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub action: KeyAction,
    /// Set when the input source generated this event as an OS-level
    /// repeat. The controller times repeats itself, so this is ignored.
    pub native_repeat: bool,
}

#[derive(Debug, Clone, Copy)]
struct RepeatSession {
    direction: Direction,
}

pub struct KeyRepeatController {
    session: Option<RepeatSession>,
    initial_delay: Duration,
    interval: Duration,
}

impl KeyRepeatController {
    pub fn new(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            session: None,
            initial_delay,
            interval,
        }
    }

    /// Whether a key is currently held.
    pub fn holding(&self) -> bool {
        self.session.is_some()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.session.map(|s| s.direction)
    }

    /// Feed one hardware key event. Returns `true` when the overlay
    /// should be shown or refreshed as a result.
    pub fn on_key_event<B: VolumeBackend>(
        &mut self,
        event: KeyEvent,
        now: Instant,
        backend: &mut B,
        notifier: &mut EventNotifier,
        timers: &mut TimerQueue,
    ) -> bool {
        match event.action {
            KeyAction::Down => {
                let direction = match event.code {
                    KeyCode::VolumeUp => Direction::Raise,
                    KeyCode::VolumeDown => Direction::Lower,
                };
                if let Some(session) = self.session {
                    if session.direction == direction {
                        // Already holding this key; we own the cadence.
                        return false;
                    }
                    // Supersession: never two concurrent repeat timers.
                    timers.cancel(TimerSlot::Repeat);
                }
                debug!(?direction, "repeat session started");
                self.session = Some(RepeatSession { direction });
                if !self.adjust_once(direction, backend, notifier, timers) {
                    return false;
                }
                timers.schedule(TimerSlot::Repeat, now + self.initial_delay);
                true
            }
            KeyAction::Up => {
                timers.cancel(TimerSlot::Repeat);
                if self.session.take().is_some() {
                    debug!("repeat session ended");
                }
                false
            }
        }
    }

    /// Handle one fire of the repeat timer. Returns `true` when a step
    /// was performed (and the overlay should stay alive).
    pub fn on_repeat_tick<B: VolumeBackend>(
        &mut self,
        now: Instant,
        backend: &mut B,
        notifier: &mut EventNotifier,
        timers: &mut TimerQueue,
    ) -> bool {
        let Some(session) = self.session else {
            // Stale fire after key-up; nothing to do.
            return false;
        };
        if !self.adjust_once(session.direction, backend, notifier, timers) {
            return false;
        }
        timers.schedule(TimerSlot::Repeat, now + self.interval);
        true
    }

    /// One relative step on the primary stream followed by a
    /// notification carrying the *read-back* level: near a platform cap
    /// the step may have been a silent no-op, and observers must see the
    /// actual state.
    fn adjust_once<B: VolumeBackend>(
        &mut self,
        direction: Direction,
        backend: &mut B,
        notifier: &mut EventNotifier,
        timers: &mut TimerQueue,
    ) -> bool {
        match backend.step(Stream::Media, direction) {
            Ok(()) => {
                let max = backend.max(Stream::Media);
                let current = backend.current(Stream::Media);
                notifier.notify_level(current, max);
                true
            }
            Err(VolumeError::PermissionDenied) => {
                warn!(?direction, "volume step denied; stopping key repeat");
                timers.cancel(TimerSlot::Repeat);
                self.session = None;
                false
            }
        }
    }
}
