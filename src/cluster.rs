/*!
 * Types and functions for working with clusters.
 *
 * A cluster is a group of cleaned points that all lie within a fixed planar radius of a shared
 * seed point. A ClusterMetric describes the aggregate properties of one cluster.
 */

pub use cluster::Cluster;
pub use cluster_list::{ClusterList, ClusterMetric};

mod cluster;
mod cluster_list;
mod grid;
