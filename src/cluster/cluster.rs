use super::grid::CellGrid;
use crate::{
    geo::{self, Coord},
    ClusterIndex, PipelineConfig, Point,
};
use serde::Serialize;

/// Markers on a map are scaled by member count, but never beyond this.
const MAX_VISUAL_RADIUS: f64 = 10.0;
/// Members per unit of visual radius.
const MEMBERS_PER_VISUAL_RADIUS: f64 = 20.0;

/**
 * A group of points that were all within the neighbor radius of the seed point.
 *
 * The first member is always the seed, the rest follow in input order. Members are owned copies,
 * clusters never share points.
 */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    members: Vec<Point>,
}

impl Cluster {
    /**
     * Group points into clusters.
     *
     * Points are visited in input order. Each point that has not been claimed yet becomes a seed
     * and claims every unclaimed point strictly closer than the radius to it. This is a single
     * pass, points near other members but not near the seed are not pulled in. Groups that are
     * too small are discarded and their points stay unclustered for good.
     *
     * #Arguments
     * points - the cleaned points.
     * config - supplies the radius, the minimum group size, and the neighbor search strategy.
     *
     * #Returns
     * The clusters in the order their seeds appear in `points`.
     */
    pub fn from_points(points: &[Point], config: &PipelineConfig) -> Vec<Self> {
        let radius = config.cluster_radius_deg;

        let grid = match config.cluster_index {
            ClusterIndex::Grid if radius.is_finite() && radius > 0.0 => {
                Some(CellGrid::build(points, radius))
            }
            _ => None,
        };

        let mut visited = vec![false; points.len()];
        let mut candidates: Vec<usize> = Vec::with_capacity(points.len());
        let mut clusters: Vec<Self> = vec![];

        for i in 0..points.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let seed = &points[i];
            let mut members = vec![seed.clone()];

            candidates.clear();
            match grid {
                Some(ref grid) => grid.neighborhood(seed, radius, &mut candidates),
                None => candidates.extend(0..points.len()),
            }

            for &j in &candidates {
                if visited[j] {
                    continue;
                }

                if geo::planar_distance(seed, &points[j]) < radius {
                    visited[j] = true;
                    members.push(points[j].clone());
                }
            }

            if members.len() >= config.min_cluster_members {
                clusters.push(Cluster { members });
            }
        }

        log::debug!(
            "{} clusters from {} points ({} strategy)",
            clusters.len(),
            points.len(),
            config.cluster_index
        );

        clusters
    }

    /// The points in this cluster, seed first.
    pub fn members(&self) -> &[Point] {
        &self.members
    }

    /// The number of points in the cluster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters built by [Cluster::from_points].
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean latitude and longitude of the members.
    pub fn centroid(&self) -> Coord {
        geo::centroid(&self.members)
    }

    /// Mean speed of the members in km/h.
    pub fn mean_speed(&self) -> f64 {
        self.members.iter().map(|p| p.speed).sum::<f64>() / self.members.len() as f64
    }

    /// Highest member speed in km/h.
    pub fn max_speed(&self) -> f64 {
        self.members
            .iter()
            .map(|p| p.speed)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Size of the map marker for this cluster, `min(count / 20, 10)`.
    pub fn visual_radius(&self) -> f64 {
        (self.members.len() as f64 / MEMBERS_PER_VISUAL_RADIUS).min(MAX_VISUAL_RADIUS)
    }

    /// The distance from the centroid to the farthest member in kilometers.
    pub fn extent_km(&self) -> f64 {
        let center = self.centroid();
        self.members
            .iter()
            .map(|p| geo::great_circle_distance(p.lat, p.lng, center.lat, center.lng))
            .fold(0.0, f64::max)
    }
}
