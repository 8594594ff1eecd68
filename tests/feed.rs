//! Tests for the synthetic real-time feed.

use crossbeam_channel::bounded;
use std::{sync::Arc, time::Duration};
use tracesight::{
    clean,
    feed::{ALTITUDE_JITTER_M, MAX_SYNTHETIC_SPEED_MPS, POSITION_JITTER_DEG},
    start_feed_thread, Dashboard, PipelineConfig, Point, RawPoint, SyntheticFeed,
};

fn anchor() -> Point {
    Point {
        id: "vehicle-7".to_owned(),
        lat: 47.37,
        lng: 8.55,
        alt: 400.0,
        speed: 40.0,
        heading: 90.0,
    }
}

#[test]
fn test_same_seed_same_sequence() {
    let mut left = SyntheticFeed::seeded(42);
    let mut right = SyntheticFeed::seeded(42);

    for _ in 0..10 {
        assert_eq!(left.next_point(&anchor()), right.next_point(&anchor()));
    }
}

#[test]
fn test_jitter_is_bounded_and_clean() {
    let mut feed = SyntheticFeed::seeded(7);
    let a = anchor();

    let raw: Vec<RawPoint> = (0..500).map(|_| feed.next_point(&a)).collect();
    let report = clean(&raw, &PipelineConfig::default()).unwrap();

    assert_eq!(report.points.len(), 500);
    for p in &report.points {
        assert_eq!(p.id, "vehicle-7");
        assert!((p.lat - a.lat).abs() <= POSITION_JITTER_DEG + 1.0e-12);
        assert!((p.lng - a.lng).abs() <= POSITION_JITTER_DEG + 1.0e-12);
        assert!((p.alt - a.alt).abs() <= ALTITUDE_JITTER_M + 1.0e-9);
        assert!(p.speed >= 0.0 && p.speed <= MAX_SYNTHETIC_SPEED_MPS * 3.6 + 1.0e-9);
        assert!(p.heading >= 0.0 && p.heading < 360.0);
    }
}

#[test]
fn test_feed_thread_sends_limited_points() {
    let dash = Arc::new(Dashboard::new(PipelineConfig::default()));
    dash.ingest_batch(vec![RawPoint::from(&anchor())]).unwrap();

    let (tx, rx) = bounded(16);
    let jh = start_feed_thread(
        SyntheticFeed::seeded(1),
        Arc::clone(&dash),
        Duration::from_millis(1),
        Some(3),
        tx,
    )
    .unwrap();

    let received: Vec<RawPoint> = rx.iter().collect();
    assert_eq!(jh.join().unwrap(), 3);
    assert_eq!(received.len(), 3);

    for raw in received {
        dash.append_point(raw).unwrap();
    }
    assert_eq!(dash.history_len(), 4);
}

#[test]
fn test_feed_thread_stops_when_receiver_hangs_up() {
    let dash = Arc::new(Dashboard::new(PipelineConfig::default()));
    dash.ingest_batch(vec![RawPoint::from(&anchor())]).unwrap();

    let (tx, rx) = bounded(1);
    drop(rx);

    let jh = start_feed_thread(
        SyntheticFeed::seeded(1),
        dash,
        Duration::from_millis(1),
        None,
        tx,
    )
    .unwrap();

    assert_eq!(jh.join().unwrap(), 0);
}
