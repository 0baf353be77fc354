use std::sync::{Arc, Mutex};

use volume_overlay::backend::VolumeBackend;
use volume_overlay::layout::PanelGeometry;
use volume_overlay::notifier::EventNotifier;
use volume_overlay::slider::{PointerEvent, PointerOutcome, PointerPhase, SliderInputController};
use volume_overlay::stream::Stream;

use mock_backend::ScriptedBackend;

fn pointer(id: u64, x: f32, y: f32, phase: PointerPhase) -> PointerEvent {
    PointerEvent { id, x, y, phase }
}

struct Fixture {
    geometry: PanelGeometry,
    sliders: SliderInputController,
    backend: ScriptedBackend,
    notifier: EventNotifier,
}

impl Fixture {
    fn new(backend: ScriptedBackend) -> Self {
        Self {
            geometry: PanelGeometry::default(),
            sliders: SliderInputController::new(),
            backend,
            notifier: EventNotifier::new(),
        }
    }

    fn primary(&mut self, event: PointerEvent) -> PointerOutcome {
        self.sliders
            .on_pointer_event(&self.geometry.primary(), event, &mut self.backend, &mut self.notifier)
    }

    fn secondary(&mut self, event: PointerEvent) -> PointerOutcome {
        self.sliders.on_pointer_event(
            &self.geometry.secondary(),
            event,
            &mut self.backend,
            &mut self.notifier,
        )
    }
}

#[test]
fn drag_fraction_maps_to_target_level() {
    // Default track: top inset 120, bottom inset 40 on a 600-high
    // slider, so the track spans y in [120, 560] with height 440.
    // fraction 0.73 -> y = 560 - 0.73 * 440 = 238.8, target = 11.
    let mut fx = Fixture::new(ScriptedBackend::new().with_level(Stream::Media, 5));

    assert_eq!(fx.primary(pointer(1, 70.0, 238.8, PointerPhase::Down)), PointerOutcome::Claimed);
    assert_eq!(fx.backend.step_count(), 0, "down alone does not step");

    assert_eq!(fx.primary(pointer(1, 70.0, 238.8, PointerPhase::Move)), PointerOutcome::Claimed);
    assert_eq!(fx.backend.current(Stream::Media), 11);
    assert_eq!(fx.backend.step_count(), 6, "|11 - 5| steps");
}

#[test]
fn fraction_clamps_beyond_track_ends() {
    let mut fx = Fixture::new(ScriptedBackend::new().with_level(Stream::Media, 5));

    fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Down));
    fx.primary(pointer(1, 70.0, -250.0, PointerPhase::Move));
    assert_eq!(fx.backend.current(Stream::Media), 15, "above the track clamps to 1");
    assert_eq!(fx.sliders.dragged_fraction(Stream::Media), Some(1.0));

    fx.primary(pointer(1, 70.0, 900.0, PointerPhase::Move));
    assert_eq!(fx.backend.current(Stream::Media), 0, "below the track clamps to 0");
    assert_eq!(fx.sliders.dragged_fraction(Stream::Media), Some(0.0));
}

#[test]
fn down_outside_all_regions_is_not_claimed() {
    let mut fx = Fixture::new(ScriptedBackend::new());

    // The gap between the slider and the expand button belongs to
    // neither region.
    assert_eq!(fx.primary(pointer(1, 70.0, 615.0, PointerPhase::Down)), PointerOutcome::Unclaimed);
    assert!(!fx.sliders.any_session());

    // Moves and ups for an unclaimed pointer stay unclaimed.
    assert_eq!(fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Move)), PointerOutcome::Unclaimed);
    assert_eq!(fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Up)), PointerOutcome::Unclaimed);
    assert_eq!(fx.backend.step_count(), 0);
}

#[test]
fn expand_region_requests_toggle_instead_of_drag() {
    let mut fx = Fixture::new(ScriptedBackend::new());

    let outcome = fx.primary(pointer(1, 70.0, 700.0, PointerPhase::Down));
    assert_eq!(outcome, PointerOutcome::ExpandRequested);
    assert!(!fx.sliders.any_session(), "the expand button never starts a drag");
}

#[test]
fn secondary_panel_hit_tests_per_stream() {
    // Secondary layout, right to left: ring [320, 460), notification
    // [160, 300), alarm [0, 140).
    let mut fx = Fixture::new(
        ScriptedBackend::new()
            .with_level(Stream::Ring, 0)
            .with_level(Stream::Alarm, 0),
    );

    assert_eq!(fx.secondary(pointer(1, 390.0, 300.0, PointerPhase::Down)), PointerOutcome::Claimed);
    fx.secondary(pointer(1, 390.0, 120.0, PointerPhase::Move));
    assert_eq!(fx.backend.current(Stream::Ring), 15);
    assert_eq!(fx.backend.current(Stream::Alarm), 0, "other streams untouched");

    // The gap between sliders is dead space.
    assert_eq!(fx.secondary(pointer(2, 310.0, 300.0, PointerPhase::Down)), PointerOutcome::Unclaimed);
}

#[test]
fn one_session_per_stream() {
    let mut fx = Fixture::new(ScriptedBackend::new());

    assert_eq!(fx.secondary(pointer(1, 390.0, 300.0, PointerPhase::Down)), PointerOutcome::Claimed);
    // A second pointer cannot grab a stream that is already dragged.
    assert_eq!(fx.secondary(pointer(2, 395.0, 310.0, PointerPhase::Down)), PointerOutcome::Unclaimed);
    // But it can grab a different stream.
    assert_eq!(fx.secondary(pointer(2, 70.0, 300.0, PointerPhase::Down)), PointerOutcome::Claimed);
    assert_eq!(fx.sliders.session_count(), 2);
}

#[test]
fn up_destroys_the_session() {
    let mut fx = Fixture::new(ScriptedBackend::new().with_level(Stream::Media, 5));

    fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Down));
    assert!(fx.sliders.any_session());

    assert_eq!(fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Up)), PointerOutcome::Claimed);
    assert!(!fx.sliders.any_session());

    // The pointer no longer owns a session, so moves do nothing.
    assert_eq!(fx.primary(pointer(1, 70.0, 130.0, PointerPhase::Move)), PointerOutcome::Unclaimed);
    assert_eq!(fx.backend.current(Stream::Media), 5);
}

#[test]
fn cancel_behaves_like_up() {
    let mut fx = Fixture::new(ScriptedBackend::new());

    fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Down));
    assert_eq!(fx.primary(pointer(1, 70.0, 300.0, PointerPhase::Cancel)), PointerOutcome::Claimed);
    assert!(!fx.sliders.any_session());
}

#[test]
fn moves_that_apply_nothing_do_not_notify() {
    let mut fx = Fixture::new(ScriptedBackend::new().with_level(Stream::Media, 5));
    let changes = Arc::new(Mutex::new(0u32));
    let sink = changes.clone();
    fx.notifier.subscribe(move |_| *sink.lock().unwrap() += 1);

    fx.primary(pointer(1, 70.0, 238.8, PointerPhase::Down));
    fx.primary(pointer(1, 70.0, 238.8, PointerPhase::Move));
    assert_eq!(*changes.lock().unwrap(), 1, "one change for the real apply");

    // Wiggling within the same level stays silent.
    fx.primary(pointer(1, 70.0, 239.5, PointerPhase::Move));
    fx.primary(pointer(1, 70.0, 238.0, PointerPhase::Move));
    assert_eq!(*changes.lock().unwrap(), 1);
}

#[test]
fn dragging_reports_live_fraction() {
    let mut fx = Fixture::new(ScriptedBackend::new().with_level(Stream::Media, 5));

    fx.primary(pointer(1, 70.0, 340.0, PointerPhase::Down));
    // fraction at down: (560 - 340) / 440 = 0.5
    let fraction = fx.sliders.dragged_fraction(Stream::Media).unwrap();
    assert!((fraction - 0.5).abs() < 1e-6);
}
