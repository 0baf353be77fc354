//! Overlay show/hide lifecycle.
//!
//! Owns the primary panel's visibility state machine, the secondary
//! panel toggle and the auto-hide debounce timer. Window attach/detach
//! goes through the external surface capability; duplicate-state errors
//! from it are swallowed so repeated `show()`/`hide()` calls stay
//! idempotent.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::SurfaceError;
use crate::timer::{TimerQueue, TimerSlot};

/// Which overlay window a surface call refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Primary,
    Secondary,
}

/// Opaque token for an attached window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Where the window sits relative to the screen edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub edge_offset_x: i32,
}

pub const PRIMARY_PLACEMENT: Placement = Placement { edge_offset_x: 24 };
pub const SECONDARY_PLACEMENT: Placement = Placement { edge_offset_x: 184 };

/// External window-surface capability. Attach/detach are treated as
/// fire-and-forget; "already attached/detached" is not an error from the
/// lifecycle manager's point of view.
pub trait Surface {
    fn attach(&mut self, panel: PanelKind, placement: Placement) -> Result<SurfaceHandle, SurfaceError>;
    fn detach(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Showing,
    Visible,
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SecondaryState {
    Closed,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy)]
pub struct OverlayTimings {
    pub show: Duration,
    pub hide: Duration,
    pub secondary: Duration,
    pub grace: Duration,
}

pub struct OverlayLifecycleManager<S: Surface> {
    surface: S,
    timings: OverlayTimings,
    primary: PanelState,
    primary_handle: Option<SurfaceHandle>,
    /// The primary window is created lazily on first show and reused for
    /// the rest of the process lifetime.
    primary_created: bool,
    secondary: SecondaryState,
    secondary_handle: Option<SurfaceHandle>,
}

impl<S: Surface> OverlayLifecycleManager<S> {
    pub fn new(surface: S, timings: OverlayTimings) -> Self {
        Self {
            surface,
            timings,
            primary: PanelState::Hidden,
            primary_handle: None,
            primary_created: false,
            secondary: SecondaryState::Closed,
            secondary_handle: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn primary_state(&self) -> PanelState {
        self.primary
    }

    /// Whether the secondary panel currently has a window (open or still
    /// playing its exit transition).
    pub fn secondary_visible(&self) -> bool {
        self.secondary != SecondaryState::Closed
    }

    pub fn secondary_open(&self) -> bool {
        self.secondary == SecondaryState::Open
    }

    /// Bring the primary panel up and arm the auto-hide deadline.
    /// Idempotent; calling while the hide transition runs interrupts the
    /// teardown in place, so the panel never passes through `Hidden`.
    pub fn show(&mut self, now: Instant, timers: &mut TimerQueue) {
        match self.primary {
            PanelState::Hidden => {
                if !self.primary_created {
                    debug!("creating primary overlay window");
                    self.primary_created = true;
                }
                match self.surface.attach(PanelKind::Primary, PRIMARY_PLACEMENT) {
                    Ok(handle) => self.primary_handle = Some(handle),
                    // Still attached from an earlier cycle; keep the handle.
                    Err(SurfaceError::AlreadyAttached) | Err(SurfaceError::AlreadyDetached) => {}
                }
                self.primary = PanelState::Showing;
                timers.schedule(TimerSlot::PrimaryTransition, now + self.timings.show);
            }
            PanelState::Showing | PanelState::Visible => {}
            PanelState::Hiding => {
                // Interrupt the hide transition; the window is still
                // attached, so no re-attach and no blank frame.
                timers.cancel(TimerSlot::PrimaryTransition);
                self.primary = PanelState::Visible;
                debug!("hide transition cancelled by show");
            }
        }
        timers.schedule(TimerSlot::AutoHide, now + self.timings.grace);
    }

    /// Push the auto-hide deadline out to `now + grace`. Called for every
    /// qualifying interaction; a no-op while the panel is hidden.
    pub fn note_interaction(&mut self, now: Instant, timers: &mut TimerQueue) {
        if self.primary != PanelState::Hidden {
            timers.schedule(TimerSlot::AutoHide, now + self.timings.grace);
        }
    }

    /// The auto-hide deadline elapsed. Hides the panel unless an input
    /// session is still active, in which case the countdown restarts.
    pub fn on_auto_hide_elapsed(
        &mut self,
        now: Instant,
        timers: &mut TimerQueue,
        sessions_active: bool,
    ) {
        if sessions_active {
            timers.schedule(TimerSlot::AutoHide, now + self.timings.grace);
            return;
        }
        self.hide(now, timers);
    }

    /// Begin the hide transition. A no-op on an already-hidden (or
    /// already-hiding) panel: no surface calls are issued.
    pub fn hide(&mut self, now: Instant, timers: &mut TimerQueue) {
        match self.primary {
            PanelState::Hidden | PanelState::Hiding => {}
            PanelState::Showing | PanelState::Visible => {
                timers.cancel(TimerSlot::AutoHide);
                self.primary = PanelState::Hiding;
                timers.schedule(TimerSlot::PrimaryTransition, now + self.timings.hide);
                // The secondary never outlives the primary.
                self.close_secondary_immediately(timers);
                debug!("primary panel hiding");
            }
        }
    }

    /// Completion of the primary show or hide transition.
    pub fn on_primary_transition_complete(&mut self) {
        match self.primary {
            PanelState::Showing => self.primary = PanelState::Visible,
            PanelState::Hiding => {
                self.detach_primary();
                self.primary = PanelState::Hidden;
                debug!("primary panel hidden");
            }
            // Stale fire after a cancelled transition.
            PanelState::Hidden | PanelState::Visible => {}
        }
    }

    /// Expand-button behaviour: open the secondary panel, or close it if
    /// it is already up.
    pub fn toggle_secondary(&mut self, now: Instant, timers: &mut TimerQueue) {
        match self.secondary {
            SecondaryState::Closed => self.open_secondary(),
            SecondaryState::Open => self.close_secondary(now, timers),
            SecondaryState::Closing => {
                // Re-open while the exit transition runs: finish the
                // teardown now so only one secondary window ever exists.
                timers.cancel(TimerSlot::SecondaryTransition);
                self.detach_secondary();
                self.open_secondary();
            }
        }
        self.note_interaction(now, timers);
    }

    /// Open the secondary panel. A no-op when it is already open.
    pub fn open_secondary(&mut self) {
        if self.secondary == SecondaryState::Open {
            return;
        }
        match self.surface.attach(PanelKind::Secondary, SECONDARY_PLACEMENT) {
            Ok(handle) => self.secondary_handle = Some(handle),
            Err(SurfaceError::AlreadyAttached) | Err(SurfaceError::AlreadyDetached) => {}
        }
        self.secondary = SecondaryState::Open;
        debug!("secondary panel opened");
    }

    /// Play the exit transition, then detach. A no-op when closed.
    pub fn close_secondary(&mut self, now: Instant, timers: &mut TimerQueue) {
        if self.secondary != SecondaryState::Open {
            return;
        }
        self.secondary = SecondaryState::Closing;
        timers.schedule(TimerSlot::SecondaryTransition, now + self.timings.secondary);
        debug!("secondary panel closing");
    }

    /// Completion of the secondary exit transition.
    pub fn on_secondary_transition_complete(&mut self) {
        if self.secondary == SecondaryState::Closing {
            self.detach_secondary();
            self.secondary = SecondaryState::Closed;
            debug!("secondary panel closed");
        }
    }

    fn close_secondary_immediately(&mut self, timers: &mut TimerQueue) {
        if self.secondary == SecondaryState::Closed {
            return;
        }
        timers.cancel(TimerSlot::SecondaryTransition);
        self.detach_secondary();
        self.secondary = SecondaryState::Closed;
    }

    fn detach_primary(&mut self) {
        if let Some(handle) = self.primary_handle.take() {
            if let Err(err) = self.surface.detach(handle) {
                debug!(%err, "primary detach skipped");
            }
        }
    }

    fn detach_secondary(&mut self) {
        if let Some(handle) = self.secondary_handle.take() {
            if let Err(err) = self.surface.detach(handle) {
                debug!(%err, "secondary detach skipped");
            }
        }
    }
}
