//! The overlay service: one object graph, one control flow.
//!
//! Owns the backend session, the notifier, the timer slots and the three
//! controllers, and serializes every external event (key, pointer,
//! direct set, timer fire) through `&mut self` methods. Nothing here
//! blocks; the caller drives [`OverlayService::advance`] whenever
//! [`OverlayService::next_deadline`] passes.

use std::time::Instant;

use tracing::{debug, warn};

use crate::backend::VolumeBackend;
use crate::error::RemoteSetError;
use crate::keyrepeat::{KeyEvent, KeyRepeatController};
use crate::layout::PanelGeometry;
use crate::notifier::EventNotifier;
use crate::overlay::{OverlayLifecycleManager, OverlayTimings, PanelKind, PanelState, Surface};
use crate::settings::Settings;
use crate::slider::{PointerEvent, PointerOutcome, PointerPhase, SliderInputController};
use crate::stream::Stream;
use crate::timer::{TimerQueue, TimerSlot};

pub struct OverlayService<B: VolumeBackend, S: Surface> {
    backend: Option<B>,
    notifier: EventNotifier,
    timers: TimerQueue,
    keys: KeyRepeatController,
    overlay: OverlayLifecycleManager<S>,
    sliders: SliderInputController,
    geometry: PanelGeometry,
}

impl<B: VolumeBackend, S: Surface> OverlayService<B, S> {
    pub fn new(settings: &Settings, surface: S) -> Self {
        let timings = OverlayTimings {
            show: settings.show_duration(),
            hide: settings.hide_duration(),
            secondary: settings.secondary_duration(),
            grace: settings.auto_hide_grace(),
        };
        Self {
            backend: None,
            notifier: EventNotifier::new(),
            timers: TimerQueue::new(),
            keys: KeyRepeatController::new(
                settings.repeat_initial_delay(),
                settings.repeat_interval(),
            ),
            overlay: OverlayLifecycleManager::new(surface, timings),
            sliders: SliderInputController::new(),
            geometry: PanelGeometry::default(),
        }
    }

    /// Attach the backend session. Until this happens key events are
    /// dropped and the direct-set entry point reports `NotReady`.
    pub fn attach_backend(&mut self, backend: B) {
        self.backend = Some(backend);
    }

    pub fn detach_backend(&mut self) -> Option<B> {
        self.backend.take()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn notifier_mut(&mut self) -> &mut EventNotifier {
        &mut self.notifier
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn primary_state(&self) -> PanelState {
        self.overlay.primary_state()
    }

    pub fn secondary_visible(&self) -> bool {
        self.overlay.secondary_visible()
    }

    pub fn surface(&self) -> &S {
        self.overlay.surface()
    }

    /// Fraction to render for a stream: the live drag fraction when a
    /// gesture owns the stream, otherwise the backend's current level.
    pub fn fraction(&self, stream: Stream) -> f32 {
        if let Some(fraction) = self.sliders.dragged_fraction(stream) {
            return fraction;
        }
        let Some(backend) = self.backend.as_ref() else {
            return 0.0;
        };
        let max = backend.max(stream);
        if max == 0 {
            return 0.0;
        }
        (backend.current(stream) as f32 / max as f32).clamp(0.0, 1.0)
    }

    /// Inject one hardware key event.
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) {
        let Some(backend) = self.backend.as_mut() else {
            debug!(?event, "key event dropped: no backend attached");
            return;
        };
        let show = self
            .keys
            .on_key_event(event, now, backend, &mut self.notifier, &mut self.timers);
        if show {
            self.overlay.show(now, &mut self.timers);
        }
    }

    /// Inject one pointer event delivered to `panel`, in that panel's
    /// local coordinates.
    pub fn handle_pointer(&mut self, panel: PanelKind, event: PointerEvent, now: Instant) {
        let release = matches!(event.phase, PointerPhase::Up | PointerPhase::Cancel);
        let accepted = match panel {
            PanelKind::Primary => self.overlay.primary_state() != PanelState::Hidden,
            PanelKind::Secondary => self.overlay.secondary_open(),
        };
        // Releases always reach the controller, even when their panel is
        // gone; a session that outlived its panel would keep deferring
        // auto-hide forever.
        if !accepted && !release {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            if release {
                self.sliders.end_session(event.id);
            }
            return;
        };
        let outcome = match panel {
            PanelKind::Primary => self.sliders.on_pointer_event(
                &self.geometry.primary(),
                event,
                backend,
                &mut self.notifier,
            ),
            PanelKind::Secondary => self.sliders.on_pointer_event(
                &self.geometry.secondary(),
                event,
                backend,
                &mut self.notifier,
            ),
        };
        if outcome == PointerOutcome::ExpandRequested {
            self.overlay.toggle_secondary(now, &mut self.timers);
        }
        // A claimed touch while the panel is tearing down revives it,
        // the same way a key press does.
        if !release
            && outcome != PointerOutcome::Unclaimed
            && self.overlay.primary_state() == PanelState::Hiding
        {
            self.overlay.show(now, &mut self.timers);
        }
        // Any touch inside either panel keeps the primary alive, the
        // secondary's gestures included.
        self.overlay.note_interaction(now, &mut self.timers);
    }

    /// Direct volume-set entry point for external callers (e.g. a
    /// cross-process bridge). Applies `fraction` of the stream maximum
    /// and brings the panel up like a key press would.
    pub fn set_absolute(
        &mut self,
        stream: Stream,
        fraction: f32,
        now: Instant,
    ) -> Result<(), RemoteSetError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(RemoteSetError::InvalidArgument(fraction));
        }
        let Some(backend) = self.backend.as_mut() else {
            return Err(RemoteSetError::NotReady);
        };
        let max = backend.max(stream);
        let target = (fraction * max as f32).round() as u32;
        if let Err(err) = crate::backend::apply_target(backend, stream, target) {
            warn!(%err, %stream, target, "direct volume set aborted");
        }
        self.notifier
            .notify_level(backend.current(stream), backend.max(stream));
        self.overlay.show(now, &mut self.timers);
        Ok(())
    }

    /// Earliest pending timer deadline, used by the control loop to
    /// bound its wait.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Fire every timer slot whose deadline has passed.
    pub fn advance(&mut self, now: Instant) {
        for slot in self.timers.take_due(now) {
            match slot {
                TimerSlot::Repeat => {
                    let Some(backend) = self.backend.as_mut() else {
                        continue;
                    };
                    let stepped = self.keys.on_repeat_tick(
                        now,
                        backend,
                        &mut self.notifier,
                        &mut self.timers,
                    );
                    if stepped {
                        self.overlay.show(now, &mut self.timers);
                    }
                }
                TimerSlot::AutoHide => {
                    let busy = self.keys.holding() || self.sliders.any_session();
                    self.overlay
                        .on_auto_hide_elapsed(now, &mut self.timers, busy);
                }
                TimerSlot::PrimaryTransition => self.overlay.on_primary_transition_complete(),
                TimerSlot::SecondaryTransition => self.overlay.on_secondary_transition_complete(),
            }
        }
    }
}
