/*!
 * The processing run and the state it publishes.
 *
 * A run takes a batch of raw records through cleaning, clustering, and anomaly detection and
 * produces an immutable [Snapshot]. The [Dashboard] owns the retained raw history and the current
 * snapshot, lets only one run proceed at a time, and swaps in each new snapshot as a whole.
 */

use crate::{
    anomaly::{self, SpeedStats},
    clean::{self, CleanReport},
    safety, Cluster, ClusterList, ClusterMetric, PipelineConfig, Point, RawPoint, TraceSightError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use static_assertions::assert_impl_all;
use std::{
    collections::VecDeque,
    fmt::{self, Display},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, RwLock,
    },
};

/**
 * Everything derived from one processing run.
 *
 * Snapshots are never modified after they are built, a new run always makes a new one.
 */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Increases by one with every published snapshot, starting at 1.
    pub version: u64,
    /// When the run finished.
    pub computed_at: DateTime<Utc>,
    /// Number of raw records the run started with.
    pub raw_count: usize,
    /// The cleaned points in input order.
    pub points: Vec<Point>,
    /// Records the cleaner dropped because a field was malformed.
    pub dropped_malformed: usize,
    /// Records the cleaner dropped because the speed was out of range.
    pub dropped_out_of_range: usize,
    pub clusters: Vec<Cluster>,
    /// `metrics[i]` summarizes `clusters[i]`.
    pub metrics: Vec<ClusterMetric>,
    pub speed_stats: SpeedStats,
    pub anomalies: Vec<Point>,
    pub bottlenecks: Vec<Point>,
    /// 0 to 100, the share of points that are not anomalies.
    pub safety_score: u8,
}

assert_impl_all!(Snapshot: Send, Sync);

impl Snapshot {
    /**
     * Run the whole pipeline over a batch of raw records.
     *
     * #Returns
     * `TraceSightError::NoValidData` if nothing survived cleaning, in which case nothing
     * downstream was computed.
     */
    pub fn compute(
        raw: &[RawPoint],
        config: &PipelineConfig,
        version: u64,
    ) -> Result<Self, TraceSightError> {
        let CleanReport {
            points,
            dropped_malformed,
            dropped_out_of_range,
        } = clean::clean(raw, config)?;

        let ClusterList { clusters, metrics } = ClusterList::from_points(&points, config);
        let detection = anomaly::detect(&points, config);
        let safety_score = safety::score(detection.anomalies.len(), points.len());

        Ok(Snapshot {
            version,
            computed_at: Utc::now(),
            raw_count: raw.len(),
            points,
            dropped_malformed,
            dropped_out_of_range,
            clusters,
            metrics,
            speed_stats: detection.stats,
            anomalies: detection.anomalies,
            bottlenecks: detection.bottlenecks,
            safety_score,
        })
    }

    /// Total records dropped while cleaning.
    pub fn dropped(&self) -> usize {
        self.dropped_malformed + self.dropped_out_of_range
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "          Version: {}", self.version)?;
        writeln!(f, "      Computed At: {}", self.computed_at)?;
        writeln!(f, "      Raw Records: {}", self.raw_count)?;
        writeln!(f, "   Cleaned Points: {}", self.points.len())?;
        writeln!(
            f,
            "          Dropped: {} ({} malformed, {} out of range)",
            self.dropped(),
            self.dropped_malformed,
            self.dropped_out_of_range
        )?;
        writeln!(
            f,
            "       Mean Speed: {:.1} km/h (stddev {:.1})",
            self.speed_stats.mean, self.speed_stats.stddev
        )?;
        writeln!(f, "        Anomalies: {}", self.anomalies.len())?;
        writeln!(f, "      Bottlenecks: {}", self.bottlenecks.len())?;
        writeln!(f, "     Safety Score: {}", self.safety_score)?;
        writeln!(f, "         Clusters: {}", self.metrics.len())?;

        for m in &self.metrics {
            writeln!(
                f,
                "    {:>12} - {:5} points {:4} km/h {:3}% at {:.6},{:.6}",
                m.id, m.point_count, m.avg_speed_kmh, m.density_pct, m.centroid.lat, m.centroid.lng
            )?;
        }

        Ok(())
    }
}

/**
 * Owner of the retained raw history and the published snapshot.
 *
 * Runs hold the history lock from start to finish, so there is never more than one in flight. The
 * snapshot is replaced with a single pointer swap, readers always see a complete snapshot. If a
 * run fails, neither the history nor the snapshot changes.
 */
pub struct Dashboard {
    config: PipelineConfig,
    history: Mutex<VecDeque<RawPoint>>,
    current: RwLock<Option<Arc<Snapshot>>>,
    next_version: AtomicU64,
}

assert_impl_all!(Dashboard: Send, Sync);

impl Dashboard {
    /// Create an empty dashboard, there is no snapshot until the first successful run.
    pub fn new(config: PipelineConfig) -> Self {
        Dashboard {
            config,
            history: Mutex::new(VecDeque::new()),
            current: RwLock::new(None),
            next_version: AtomicU64::new(1),
        }
    }

    /// The configuration every run uses.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /**
     * Replace the retained records with a new batch and process it.
     *
     * The whole batch is processed and retained, the history limit only trims incremental
     * appends.
     */
    pub fn ingest_batch(&self, raw: Vec<RawPoint>) -> Result<Arc<Snapshot>, TraceSightError> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        let candidate: VecDeque<RawPoint> = raw.into();
        let snapshot = self.run(&candidate)?;

        *history = candidate;
        Ok(snapshot)
    }

    /**
     * Append one record to the retained history and re-process it.
     *
     * The oldest records are dropped so that at most `history_limit` remain. A batch from
     * [Dashboard::ingest_batch] is retained whole even when it is larger than the limit, so the
     * first append after such a batch drops all but the newest `history_limit` records at once.
     */
    pub fn append_point(&self, raw: RawPoint) -> Result<Arc<Snapshot>, TraceSightError> {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        let mut candidate = history.clone();
        candidate.push_back(raw);
        while candidate.len() > self.config.history_limit {
            candidate.pop_front();
        }

        let snapshot = self.run(&candidate)?;

        *history = candidate;
        Ok(snapshot)
    }

    /// The most recently published snapshot, if any run has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The last cleaned point of the current snapshot.
    pub fn latest_point(&self) -> Option<Point> {
        self.snapshot().and_then(|snap| snap.points.last().cloned())
    }

    /// The number of raw records currently retained.
    pub fn history_len(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // Callers must hold the history lock.
    fn run(&self, raw: &VecDeque<RawPoint>) -> Result<Arc<Snapshot>, TraceSightError> {
        let raw = raw.iter().cloned().collect::<Vec<_>>();

        let version = self.next_version.load(Ordering::SeqCst);
        let snapshot = match Snapshot::compute(&raw, &self.config, version) {
            Ok(snap) => Arc::new(snap),
            Err(err) => {
                log::warn!("run rejected, keeping previous state: {}", err);
                return Err(err);
            }
        };
        self.next_version.fetch_add(1, Ordering::SeqCst);

        log::info!(
            "snapshot v{}: {} points, {} clusters, {} anomalies, {} bottlenecks, safety {}",
            snapshot.version,
            snapshot.points.len(),
            snapshot.clusters.len(),
            snapshot.anomalies.len(),
            snapshot.bottlenecks.len(),
            snapshot.safety_score
        );
        if snapshot.dropped() > 0 {
            log::info!(
                "dropped {} of {} records ({} malformed, {} out of range)",
                snapshot.dropped(),
                snapshot.raw_count,
                snapshot.dropped_malformed,
                snapshot.dropped_out_of_range
            );
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));

        Ok(snapshot)
    }
}
