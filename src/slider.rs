//! Touch-to-volume slider input.
//!
//! A per-pointer drag-session state machine. Pointer-down hit-tests the
//! active panel's regions; moves map the vertical position to a fill
//! fraction of the slider track and drive the backend through the
//! ratchet apply algorithm.

use std::collections::HashMap;

use tracing::warn;

use crate::backend::{apply_target, VolumeBackend};
use crate::layout::{PanelLayout, Region};
use crate::notifier::EventNotifier;
use crate::stream::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub phase: PointerPhase,
}

/// Live state of one in-progress touch gesture.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    pub stream: Stream,
    pub fraction: f32,
}

/// What the controller did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The event hit nothing we own.
    Unclaimed,
    /// The event belonged to a drag session.
    Claimed,
    /// The expand button was pressed; the caller should toggle the
    /// secondary panel.
    ExpandRequested,
}

pub struct SliderInputController {
    sessions: HashMap<u64, DragSession>,
}

impl SliderInputController {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn any_session(&self) -> bool {
        !self.sessions.is_empty()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop the session owned by `pointer`, if any. Also used when a
    /// release arrives after the panel that hosted the drag is gone.
    pub fn end_session(&mut self, pointer: u64) -> bool {
        self.sessions.remove(&pointer).is_some()
    }

    /// Live fraction of the session dragging `stream`, if one exists.
    pub fn dragged_fraction(&self, stream: Stream) -> Option<f32> {
        self.sessions
            .values()
            .find(|s| s.stream == stream)
            .map(|s| s.fraction)
    }

    /// Feed one pointer event, hit-testing against `layout` (the layout
    /// of the panel the event was delivered to).
    pub fn on_pointer_event<B: VolumeBackend>(
        &mut self,
        layout: &dyn PanelLayout,
        event: PointerEvent,
        backend: &mut B,
        notifier: &mut EventNotifier,
    ) -> PointerOutcome {
        match event.phase {
            PointerPhase::Down => self.on_down(layout, event),
            PointerPhase::Move => self.on_move(layout, event, backend, notifier),
            PointerPhase::Up | PointerPhase::Cancel => {
                if self.end_session(event.id) {
                    PointerOutcome::Claimed
                } else {
                    PointerOutcome::Unclaimed
                }
            }
        }
    }

    fn on_down(&mut self, layout: &dyn PanelLayout, event: PointerEvent) -> PointerOutcome {
        if self.sessions.contains_key(&event.id) {
            // One session per pointer; a duplicate down is already ours.
            return PointerOutcome::Claimed;
        }
        match layout.hit_test(event.x, event.y) {
            Some(Region::Expand) => PointerOutcome::ExpandRequested,
            Some(Region::Slider(stream)) => {
                if self.sessions.values().any(|s| s.stream == stream) {
                    // The stream is already being dragged by another
                    // pointer; do not start a second session.
                    return PointerOutcome::Unclaimed;
                }
                let fraction = layout
                    .track(stream)
                    .map(|track| track.fraction_at(event.y))
                    .unwrap_or(0.0);
                self.sessions
                    .insert(event.id, DragSession { stream, fraction });
                PointerOutcome::Claimed
            }
            None => PointerOutcome::Unclaimed,
        }
    }

    fn on_move<B: VolumeBackend>(
        &mut self,
        layout: &dyn PanelLayout,
        event: PointerEvent,
        backend: &mut B,
        notifier: &mut EventNotifier,
    ) -> PointerOutcome {
        let Some(session) = self.sessions.get_mut(&event.id) else {
            return PointerOutcome::Unclaimed;
        };
        let Some(track) = layout.track(session.stream) else {
            // Session started on a different panel; keep it alive but
            // there is nothing to recompute here.
            return PointerOutcome::Claimed;
        };
        session.fraction = track.fraction_at(event.y);

        let stream = session.stream;
        let before = backend.current(stream);
        let max = backend.max(stream);
        let target = (session.fraction * max as f32).round() as u32;
        if let Err(err) = apply_target(backend, stream, target) {
            warn!(%err, %stream, target, "slider apply aborted");
        }
        // A move that lands on the current level applied nothing, so
        // there is no change to broadcast.
        let after = backend.current(stream);
        if after != before {
            notifier.notify_level(after, backend.max(stream));
        }
        PointerOutcome::Claimed
    }
}

impl Default for SliderInputController {
    fn default() -> Self {
        Self::new()
    }
}
