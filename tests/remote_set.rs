use std::sync::{Arc, Mutex};
use std::time::Instant;

use volume_overlay::backend::VolumeBackend;
use volume_overlay::error::RemoteSetError;
use volume_overlay::notifier::VolumeChange;
use volume_overlay::overlay::PanelState;
use volume_overlay::service::OverlayService;
use volume_overlay::settings::Settings;
use volume_overlay::stream::Stream;

#[path = "mock_surface.rs"]
mod mock_surface;
use mock_backend::ScriptedBackend;
use mock_surface::MockSurface;

fn service_with(backend: ScriptedBackend) -> OverlayService<ScriptedBackend, MockSurface> {
    let mut service = OverlayService::new(&Settings::default(), MockSurface::new());
    service.attach_backend(backend);
    service
}

#[test]
fn valid_fraction_applies_and_shows_panel() {
    let mut service = service_with(ScriptedBackend::new().with_level(Stream::Media, 5));
    let changes: Arc<Mutex<Vec<VolumeChange>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = changes.clone();
    service
        .notifier_mut()
        .subscribe(move |change| sink.lock().unwrap().push(*change));

    // 0.73 * 15 = 10.95, rounds to 11.
    service
        .set_absolute(Stream::Media, 0.73, Instant::now())
        .unwrap();

    assert_eq!(service.backend().unwrap().current(Stream::Media), 11);
    assert_eq!(service.primary_state(), PanelState::Showing);

    let changes = changes.lock().unwrap();
    assert_eq!(changes.len(), 1);
    assert!((changes[0].fraction - 11.0 / 15.0).abs() < 1e-6);
}

#[test]
fn out_of_range_fraction_is_rejected() {
    let mut service = service_with(ScriptedBackend::new().with_level(Stream::Media, 5));
    let t = Instant::now();

    assert_eq!(
        service.set_absolute(Stream::Media, 1.5, t),
        Err(RemoteSetError::InvalidArgument(1.5))
    );
    assert_eq!(
        service.set_absolute(Stream::Media, -0.1, t),
        Err(RemoteSetError::InvalidArgument(-0.1))
    );
    assert!(matches!(
        service.set_absolute(Stream::Media, f32::NAN, t),
        Err(RemoteSetError::InvalidArgument(_))
    ));

    // Rejection must be side-effect free.
    assert_eq!(service.backend().unwrap().step_count(), 0);
    assert_eq!(service.primary_state(), PanelState::Hidden);
}

#[test]
fn set_without_backend_reports_not_ready() {
    let mut service: OverlayService<ScriptedBackend, MockSurface> =
        OverlayService::new(&Settings::default(), MockSurface::new());

    assert_eq!(
        service.set_absolute(Stream::Media, 0.5, Instant::now()),
        Err(RemoteSetError::NotReady)
    );
    assert_eq!(service.primary_state(), PanelState::Hidden);
}

#[test]
fn endpoints_map_to_silence_and_maximum() {
    let mut service = service_with(ScriptedBackend::new().with_level(Stream::Media, 7));
    let t = Instant::now();

    service.set_absolute(Stream::Media, 0.0, t).unwrap();
    assert_eq!(service.backend().unwrap().current(Stream::Media), 0);

    service.set_absolute(Stream::Media, 1.0, t).unwrap();
    assert_eq!(service.backend().unwrap().current(Stream::Media), 15);
}
