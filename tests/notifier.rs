use std::sync::{Arc, Mutex};

use volume_overlay::notifier::{EventNotifier, VolumeChange};

#[test]
fn observers_receive_changes_in_subscription_order() {
    let mut notifier = EventNotifier::new();
    let log: Arc<Mutex<Vec<(u32, f32)>>> = Arc::new(Mutex::new(Vec::new()));

    let first = log.clone();
    notifier.subscribe(move |c| first.lock().unwrap().push((1, c.fraction)));
    let second = log.clone();
    notifier.subscribe(move |c| second.lock().unwrap().push((2, c.fraction)));

    notifier.notify(VolumeChange { fraction: 0.5, max: 15 });

    assert_eq!(*log.lock().unwrap(), vec![(1, 0.5), (2, 0.5)]);
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut notifier = EventNotifier::new();
    let count = Arc::new(Mutex::new(0u32));

    let sink = count.clone();
    let id = notifier.subscribe(move |_| *sink.lock().unwrap() += 1);

    notifier.notify(VolumeChange { fraction: 0.2, max: 15 });
    assert!(notifier.unsubscribe(id));
    notifier.notify(VolumeChange { fraction: 0.4, max: 15 });

    assert_eq!(*count.lock().unwrap(), 1);
    assert!(!notifier.unsubscribe(id), "second unsubscribe reports the id as gone");
}

#[test]
fn notify_level_normalizes_the_fraction() {
    let mut notifier = EventNotifier::new();
    let seen: Arc<Mutex<Vec<VolumeChange>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    notifier.subscribe(move |c| sink.lock().unwrap().push(*c));

    notifier.notify_level(11, 15);
    notifier.notify_level(20, 15); // over-reported level clamps
    notifier.notify_level(3, 0); // degenerate maximum

    let seen = seen.lock().unwrap();
    assert!((seen[0].fraction - 11.0 / 15.0).abs() < 1e-6);
    assert_eq!(seen[0].max, 15);
    assert_eq!(seen[1].fraction, 1.0);
    assert_eq!(seen[2].fraction, 0.0);
    assert_eq!(seen[2].max, 0);
}

#[test]
fn ids_stay_unique_across_unsubscribes() {
    let mut notifier = EventNotifier::new();
    let a = notifier.subscribe(|_| {});
    notifier.unsubscribe(a);
    let b = notifier.subscribe(|_| {});
    assert_ne!(a, b);
}
