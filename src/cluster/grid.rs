/*!
 * Grid bucketing so a seed only has to look at nearby points.
 *
 * Points are hashed into square cells whose side is the neighbor radius. Any point within the
 * radius of a seed lies in a cell overlapping the square `[lat ± r] x [lng ± r]`, so those cells
 * hold every candidate. Candidates come back sorted by input index, which keeps the grouping
 * identical to a full scan.
 */

use crate::Point;
use rustc_hash::FxHashMap;

type CellKey = (i64, i64);

pub(super) struct CellGrid {
    cell_size: f64,
    cells: FxHashMap<CellKey, Vec<usize>>,
}

impl CellGrid {
    /// Bucket the points. `cell_size` must be finite and positive.
    pub(super) fn build(points: &[Point], cell_size: f64) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);

        let mut cells: FxHashMap<CellKey, Vec<usize>> = FxHashMap::default();
        for (i, pnt) in points.iter().enumerate() {
            let key = (cell_of(pnt.lat, cell_size), cell_of(pnt.lng, cell_size));
            cells.entry(key).or_default().push(i);
        }

        CellGrid { cell_size, cells }
    }

    /// Append the indexes of every point that could be within `radius` of `seed` to `out`,
    /// in ascending order.
    pub(super) fn neighborhood(&self, seed: &Point, radius: f64, out: &mut Vec<usize>) {
        let lat_lo = cell_of(seed.lat - radius, self.cell_size);
        let lat_hi = cell_of(seed.lat + radius, self.cell_size);
        let lng_lo = cell_of(seed.lng - radius, self.cell_size);
        let lng_hi = cell_of(seed.lng + radius, self.cell_size);

        let start = out.len();
        for lat_cell in lat_lo..=lat_hi {
            for lng_cell in lng_lo..=lng_hi {
                if let Some(members) = self.cells.get(&(lat_cell, lng_cell)) {
                    out.extend_from_slice(members);
                }
            }
        }

        out[start..].sort_unstable();
    }
}

fn cell_of(coord: f64, cell_size: f64) -> i64 {
    (coord / cell_size).floor() as i64
}
