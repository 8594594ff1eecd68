use crate::{geo::Coord, Cluster, PipelineConfig, Point};
use serde::Serialize;

/**
 * The read-only summary of one cluster.
 */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMetric {
    /// Sequential label, "Cluster 1", "Cluster 2", ...
    pub id: String,
    /// The number of points in the cluster.
    pub point_count: usize,
    /// Mean member speed, rounded to the nearest km/h.
    pub avg_speed_kmh: i64,
    /// Share of all cleaned points that are in this cluster, rounded percent.
    pub density_pct: i64,
    /// Highest member speed, km/h.
    pub max_speed_kmh: f64,
    /// Mean position of the members.
    pub centroid: Coord,
    /// Marker size for map rendering.
    pub visual_radius: f64,
    /// Distance from the centroid to the farthest member, kilometers.
    pub extent_km: f64,
}

impl ClusterMetric {
    /**
     * Summarize clusters in the order given.
     *
     * #Arguments
     * clusters - output of [Cluster::from_points].
     * total_points - the number of cleaned points the clusters were built from, must be > 0.
     */
    pub fn summarize(clusters: &[Cluster], total_points: usize) -> Vec<Self> {
        debug_assert!(total_points > 0 || clusters.is_empty());

        clusters
            .iter()
            .enumerate()
            .map(|(i, clust)| ClusterMetric {
                id: format!("Cluster {}", i + 1),
                point_count: clust.len(),
                avg_speed_kmh: clust.mean_speed().round() as i64,
                density_pct: (100.0 * clust.len() as f64 / total_points as f64).round() as i64,
                max_speed_kmh: clust.max_speed(),
                centroid: clust.centroid(),
                visual_radius: clust.visual_radius(),
                extent_km: clust.extent_km(),
            })
            .collect()
    }
}

/**
 * Clusters for a set of cleaned points along with their metrics.
 *
 * `metrics[i]` always describes `clusters[i]`.
 */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterList {
    pub clusters: Vec<Cluster>,
    pub metrics: Vec<ClusterMetric>,
}

impl ClusterList {
    /// Run the cluster engine and summarize the result.
    pub fn from_points(points: &[Point], config: &PipelineConfig) -> Self {
        let clusters = Cluster::from_points(points, config);
        let metrics = ClusterMetric::summarize(&clusters, points.len());

        ClusterList { clusters, metrics }
    }

    /// Total number of points that ended up in a cluster.
    pub fn clustered_points(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Get the number of clusters in the list.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Check if this list is empty.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
