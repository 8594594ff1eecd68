//! Tests for anomaly and bottleneck detection and the safety score.

use proptest::prelude::*;
use tracesight::{detect, score, PipelineConfig, Point, SpeedStats};

fn pt(id: &str, speed: f64) -> Point {
    Point {
        id: id.to_owned(),
        lat: 0.0,
        lng: 0.0,
        alt: 0.0,
        speed,
        heading: 0.0,
    }
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_single_fast_point_is_the_only_anomaly() {
    let mut points: Vec<Point> = (0..99).map(|i| pt(&i.to_string(), 20.0)).collect();
    points.insert(42, pt("speeder", 150.0));

    let detection = detect(&points, &PipelineConfig::default());

    assert_eq!(detection.anomalies.len(), 1);
    assert_eq!(detection.anomalies[0].id, "speeder");
    assert!(detection.bottlenecks.is_empty());
    assert_eq!(score(detection.anomalies.len(), points.len()), 99);
}

#[test]
fn test_single_point_has_no_anomaly() {
    let detection = detect(&[pt("only", 120.0)], &PipelineConfig::default());

    assert_eq!(detection.stats.stddev, 0.0);
    assert_eq!(detection.stats.threshold, 120.0);
    assert!(detection.anomalies.is_empty());
}

#[test]
fn test_population_statistics() {
    let stats = SpeedStats::from_points(&[pt("a", 10.0), pt("b", 20.0)], 2.0);

    assert!(approx_eq(stats.mean, 15.0, 1.0e-12));
    assert!(approx_eq(stats.stddev, 5.0, 1.0e-12)); // divide by N, not N - 1
    assert!(approx_eq(stats.threshold, 25.0, 1.0e-12));
}

#[test]
fn test_anomaly_threshold_is_strict() {
    let config = PipelineConfig {
        anomaly_sigma: 1.0,
        ..PipelineConfig::default()
    };

    // mean 15, stddev 5, threshold exactly 20.
    let detection = detect(&[pt("a", 10.0), pt("b", 20.0)], &config);

    assert_eq!(detection.stats.threshold, 20.0);
    assert!(detection.anomalies.is_empty());
}

#[test]
fn test_bottlenecks_below_ten() {
    let points = vec![
        pt("stopped", 0.0),
        pt("crawl", 9.99),
        pt("edge", 10.0),
        pt("moving", 50.0),
    ];

    let detection = detect(&points, &PipelineConfig::default());
    let ids: Vec<&str> = detection.bottlenecks.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["stopped", "crawl"]);
}

#[test]
fn test_anomalies_keep_input_order() {
    let mut points: Vec<Point> = (0..200).map(|i| pt(&i.to_string(), 30.0)).collect();
    points[10] = pt("first", 180.0);
    points[150] = pt("second", 190.0);

    let detection = detect(&points, &PipelineConfig::default());
    let ids: Vec<&str> = detection.anomalies.iter().map(|p| p.id.as_str()).collect();

    assert_eq!(ids, vec!["first", "second"]);
    assert_eq!(score(2, 200), 99);
}

/*-------------------------------------------------------------------------------------------------
 *                                     Property tests
 *-----------------------------------------------------------------------------------------------*/
proptest! {
    #[test]
    fn prop_anomalies_exceed_threshold(speeds in prop::collection::vec(0.0..200.0f64, 1..200)) {
        let points: Vec<Point> = speeds.iter().map(|&s| pt("p", s)).collect();
        let detection = detect(&points, &PipelineConfig::default());

        for p in &detection.anomalies {
            prop_assert!(p.speed > detection.stats.threshold);
        }
        for p in &detection.bottlenecks {
            prop_assert!(p.speed < 10.0);
        }

        let expected = points.iter().filter(|p| p.speed > detection.stats.threshold).count();
        prop_assert_eq!(detection.anomalies.len(), expected);
    }

    #[test]
    fn prop_zero_variance_has_no_anomalies(speed in 0.0..200.0f64, n in 1usize..300) {
        let points: Vec<Point> = (0..n).map(|_| pt("p", speed)).collect();
        let detection = detect(&points, &PipelineConfig::default());

        prop_assert!(detection.anomalies.is_empty());
    }

    #[test]
    fn prop_score_in_range(total in 1usize..10_000, frac in 0.0..=1.0f64) {
        let anomalies = ((total as f64) * frac).floor() as usize;
        let s = score(anomalies, total);

        prop_assert!(s <= 100);
        if anomalies == 0 {
            prop_assert_eq!(s, 100);
        }
    }
}
