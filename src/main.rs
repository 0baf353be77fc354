use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use rdev::{EventType, Key};

use volume_overlay::keyrepeat::{KeyAction, KeyCode, KeyEvent};
use volume_overlay::logging;
use volume_overlay::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging);

    let raise = parse_key(&settings.raise_key).unwrap_or(Key::UpArrow);
    let lower = parse_key(&settings.lower_key).unwrap_or(Key::DownArrow);

    let (tx, rx) = crossbeam_channel::unbounded();
    start_key_listener(tx, raise, lower);

    volume_overlay::gui::run(settings, rx)
}

/// Global key listener standing in for the hardware volume keys. OS-level
/// auto-repeat arrives as extra key-press events; the repeat controller
/// ignores those and times its own cadence.
fn start_key_listener(tx: Sender<KeyEvent>, raise: Key, lower: Key) {
    tracing::debug!(?raise, ?lower, "starting volume key listener");
    thread::spawn(move || loop {
        let tx = tx.clone();
        let result = rdev::listen(move |event| {
            let mapped = match event.event_type {
                EventType::KeyPress(k) if k == raise => Some((KeyCode::VolumeUp, KeyAction::Down)),
                EventType::KeyRelease(k) if k == raise => Some((KeyCode::VolumeUp, KeyAction::Up)),
                EventType::KeyPress(k) if k == lower => Some((KeyCode::VolumeDown, KeyAction::Down)),
                EventType::KeyRelease(k) if k == lower => Some((KeyCode::VolumeDown, KeyAction::Up)),
                _ => None,
            };
            if let Some((code, action)) = mapped {
                let _ = tx.send(KeyEvent {
                    code,
                    action,
                    native_repeat: false,
                });
            }
        });

        match result {
            Ok(()) => tracing::warn!("key listener exited unexpectedly; restarting shortly"),
            Err(e) => tracing::warn!("key listener failed: {:?}; retrying shortly", e),
        }
        thread::sleep(Duration::from_millis(500));
    });
}

fn parse_key(s: &str) -> Option<Key> {
    match s.trim().to_ascii_uppercase().as_str() {
        "UP" | "UPARROW" => Some(Key::UpArrow),
        "DOWN" | "DOWNARROW" => Some(Key::DownArrow),
        "LEFT" | "LEFTARROW" => Some(Key::LeftArrow),
        "RIGHT" | "RIGHTARROW" => Some(Key::RightArrow),
        "PAGEUP" => Some(Key::PageUp),
        "PAGEDOWN" => Some(Key::PageDown),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "F1" => Some(Key::F1),
        "F2" => Some(Key::F2),
        "F3" => Some(Key::F3),
        "F4" => Some(Key::F4),
        "F5" => Some(Key::F5),
        "F6" => Some(Key::F6),
        "F7" => Some(Key::F7),
        "F8" => Some(Key::F8),
        "F9" => Some(Key::F9),
        "F10" => Some(Key::F10),
        "F11" => Some(Key::F11),
        "F12" => Some(Key::F12),
        _ => None,
    }
}
