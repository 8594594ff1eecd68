/*!
 * Speed based anomaly and bottleneck detection.
 *
 * An anomaly is a point much faster than the rest of the population, a bottleneck is a point that
 * is barely moving. The two are computed independently of each other.
 */

use crate::{PipelineConfig, Point};
use serde::Serialize;

/// Population statistics of the speed of a set of points, km/h.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedStats {
    pub mean: f64,
    /// Population (divide by N) standard deviation.
    pub stddev: f64,
    /// Speeds strictly above this are anomalies.
    pub threshold: f64,
}

impl SpeedStats {
    /// Compute the statistics. `points` must not be empty.
    pub fn from_points(points: &[Point], sigma: f64) -> Self {
        debug_assert!(!points.is_empty());

        let n = points.len() as f64;
        let mean = points.iter().map(|p| p.speed).sum::<f64>() / n;
        let variance = points
            .iter()
            .map(|p| (p.speed - mean) * (p.speed - mean))
            .sum::<f64>()
            / n;
        let stddev = variance.sqrt();

        SpeedStats {
            mean,
            stddev,
            threshold: mean + sigma * stddev,
        }
    }
}

/// Outcome of [detect].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub stats: SpeedStats,
    /// Points faster than `stats.threshold`, in input order.
    pub anomalies: Vec<Point>,
    /// Points slower than the bottleneck speed, in input order.
    pub bottlenecks: Vec<Point>,
}

/**
 * Flag the speed outliers and the slow points.
 *
 * #Arguments
 * points - a non-empty set of cleaned points.
 * config - supplies the number of standard deviations and the bottleneck speed.
 */
pub fn detect(points: &[Point], config: &PipelineConfig) -> Detection {
    let stats = SpeedStats::from_points(points, config.anomaly_sigma);

    let anomalies: Vec<Point> = points
        .iter()
        .filter(|p| p.speed > stats.threshold)
        .cloned()
        .collect();

    let bottlenecks: Vec<Point> = points
        .iter()
        .filter(|p| p.speed < config.bottleneck_speed_kmh)
        .cloned()
        .collect();

    log::debug!(
        "speed mean {:.1} km/h, stddev {:.1}, threshold {:.1}: {} anomalies, {} bottlenecks",
        stats.mean,
        stats.stddev,
        stats.threshold,
        anomalies.len(),
        bottlenecks.len()
    );

    Detection {
        stats,
        anomalies,
        bottlenecks,
    }
}
