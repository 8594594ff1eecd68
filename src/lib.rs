pub use anomaly::{detect, Detection, SpeedStats};
pub use clean::{clean, retain_valid, CleanReport};
pub use cluster::{Cluster, ClusterList, ClusterMetric};
pub use config::{ClusterIndex, PipelineConfig};
pub use error::{TraceSightError, TraceSightResult};
pub use feed::{start_feed_thread, SyntheticFeed};
pub use geo::Coord;
pub use pipeline::{Dashboard, Snapshot};
pub use point::{Point, RawPoint};
pub use safety::score;

pub mod config;
pub mod feed;
pub mod geo;
pub mod point;

/**************************************************************************************************
 * Private Implementation
 *************************************************************************************************/
mod anomaly;
mod clean;
mod cluster;
mod error;
mod pipeline;
mod safety;
