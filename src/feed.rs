/*!
 * Synthetic real-time feed.
 *
 * Produces a new raw record on a fixed interval by jittering the most recent cleaned point. This
 * stands in for a live source so the incremental path of the [Dashboard] can be exercised.
 */

use crate::{Dashboard, Point, RawPoint};
use crossbeam_channel::{tick, Sender};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::Value;
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

/// Maximum change in latitude and longitude per step, degrees.
pub const POSITION_JITTER_DEG: f64 = 0.001;
/// Maximum change in altitude per step, meters.
pub const ALTITUDE_JITTER_M: f64 = 5.0;
/// Synthetic speeds are drawn from `[0, MAX_SYNTHETIC_SPEED_MPS]`.
pub const MAX_SYNTHETIC_SPEED_MPS: f64 = 30.0;

/// Generator of synthetic records.
pub struct SyntheticFeed {
    rng: StdRng,
}

impl SyntheticFeed {
    /// A feed with a fixed seed, the same seed always gives the same sequence.
    pub fn seeded(seed: u64) -> Self {
        SyntheticFeed {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A feed seeded from the operating system.
    pub fn from_entropy() -> Self {
        SyntheticFeed {
            rng: StdRng::from_entropy(),
        }
    }

    /// Derive the next raw record from `anchor`. Speed is in m/s like any other raw record.
    pub fn next_point(&mut self, anchor: &Point) -> RawPoint {
        let lat = anchor.lat + self.rng.gen_range(-POSITION_JITTER_DEG..=POSITION_JITTER_DEG);
        let lng = anchor.lng + self.rng.gen_range(-POSITION_JITTER_DEG..=POSITION_JITTER_DEG);
        let alt = anchor.alt + self.rng.gen_range(-ALTITUDE_JITTER_M..=ALTITUDE_JITTER_M);
        let spd = self.rng.gen_range(0.0..=MAX_SYNTHETIC_SPEED_MPS);
        let azm = self.rng.gen_range(0.0..360.0);

        RawPoint {
            randomized_id: Value::String(anchor.id.clone()),
            lat: Value::from(lat),
            lng: Value::from(lng),
            alt: Value::from(alt),
            spd: Value::from(spd),
            azm: Value::from(azm),
        }
    }
}

/**
 * Start a thread that sends one synthetic record per `interval`.
 *
 * The anchor for each record is the latest point published by `dashboard`, ticks where there is no
 * snapshot yet are skipped. The thread stops after `limit` records (if given) or as soon as the
 * receiving end of `to_analysis` hangs up.
 */
pub fn start_feed_thread(
    mut feed: SyntheticFeed,
    dashboard: Arc<Dashboard>,
    interval: Duration,
    limit: Option<usize>,
    to_analysis: Sender<RawPoint>,
) -> std::io::Result<JoinHandle<usize>> {
    thread::Builder::new()
        .name("tracesight-feed".to_owned())
        .spawn(move || {
            let ticker = tick(interval);
            let mut sent = 0;

            while limit.map_or(true, |limit| sent < limit) {
                if ticker.recv().is_err() {
                    break;
                }

                let anchor = match dashboard.latest_point() {
                    Some(pnt) => pnt,
                    None => {
                        log::debug!("no snapshot to anchor the feed yet");
                        continue;
                    }
                };

                if to_analysis.send(feed.next_point(&anchor)).is_err() {
                    log::debug!("feed receiver hung up after {} points", sent);
                    break;
                }
                sent += 1;
            }

            sent
        })
}
