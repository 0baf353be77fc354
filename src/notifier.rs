//! Observer registry for normalized volume-changed notifications.
//!
//! External observers (an on-screen indicator, a cross-process bridge)
//! subscribe here and receive every change synchronously on the control
//! thread, in subscription order.

use tracing::trace;

/// Normalized volume notification payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeChange {
    /// Level as a fraction of the stream maximum, in `[0, 1]`.
    pub fraction: f32,
    /// Platform-reported maximum at the time of the change.
    pub max: u32,
}

/// Identifier handed out by [`EventNotifier::subscribe`], used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&VolumeChange)>;

pub struct EventNotifier {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&VolumeChange) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns `false` when the
    /// id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn notify(&mut self, change: VolumeChange) {
        trace!(fraction = change.fraction, max = change.max, "volume changed");
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }

    /// Convenience for the common "read back, then broadcast" pattern.
    pub fn notify_level(&mut self, current: u32, max: u32) {
        let fraction = if max > 0 {
            (current as f32 / max as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.notify(VolumeChange { fraction, max });
    }
}

impl Default for EventNotifier {
    fn default() -> Self {
        Self::new()
    }
}
