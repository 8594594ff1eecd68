/*! Tunable thresholds for a processing run. */

use serde::Serialize;
use static_assertions::const_assert;
use strum::{Display, EnumString};

/// Two points closer than this, in raw degrees, are neighbors.
pub const DEFAULT_CLUSTER_RADIUS_DEG: f64 = 0.005;
/// A group must have at least this many members to be kept as a cluster.
pub const DEFAULT_MIN_CLUSTER_MEMBERS: usize = 6;
/// Points faster than this (km/h) are rejected as bad fixes.
pub const DEFAULT_MAX_SPEED_KMH: f64 = 200.0;
/// Points slower than this (km/h) are bottlenecks.
pub const DEFAULT_BOTTLENECK_SPEED_KMH: f64 = 10.0;
/// Number of standard deviations above the mean speed that marks an anomaly.
pub const DEFAULT_ANOMALY_SIGMA: f64 = 2.0;
/// Number of raw records retained for incremental runs.
pub const DEFAULT_HISTORY_LIMIT: usize = 1_000;

const_assert!(DEFAULT_MIN_CLUSTER_MEMBERS > 1);
const_assert!(DEFAULT_HISTORY_LIMIT > 0);

/// How the cluster engine finds the neighbors of a seed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ClusterIndex {
    /// Compare the seed against every other point.
    Pairwise,
    /// Only compare against points in nearby grid cells.
    Grid,
}

/// Thresholds used by every stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub cluster_radius_deg: f64,
    pub min_cluster_members: usize,
    pub cluster_index: ClusterIndex,
    pub max_speed_kmh: f64,
    pub bottleneck_speed_kmh: f64,
    pub anomaly_sigma: f64,
    pub history_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            cluster_radius_deg: DEFAULT_CLUSTER_RADIUS_DEG,
            min_cluster_members: DEFAULT_MIN_CLUSTER_MEMBERS,
            cluster_index: ClusterIndex::Grid,
            max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
            bottleneck_speed_kmh: DEFAULT_BOTTLENECK_SPEED_KMH,
            anomaly_sigma: DEFAULT_ANOMALY_SIGMA,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Set the neighbor radius in degrees.
    pub fn with_cluster_radius_deg(mut self, radius: f64) -> Self {
        self.cluster_radius_deg = radius;
        self
    }

    /// Set the minimum number of members for a cluster to be kept.
    pub fn with_min_cluster_members(mut self, members: usize) -> Self {
        self.min_cluster_members = members;
        self
    }

    /// Choose the neighbor search strategy.
    pub fn with_cluster_index(mut self, index: ClusterIndex) -> Self {
        self.cluster_index = index;
        self
    }

    /// Set the maximum number of raw records kept between incremental runs.
    ///
    /// A limit of zero is treated as one, there must always be room for the newest record.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }
}
