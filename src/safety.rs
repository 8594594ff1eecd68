/*! The aggregate safety score. */

/**
 * Score a run from 0 to 100 by the share of points that were not anomalies.
 *
 * `total_count` must be greater than zero, the cleaner guarantees this by refusing to produce an
 * empty point set.
 */
pub fn score(anomaly_count: usize, total_count: usize) -> u8 {
    debug_assert!(total_count > 0);
    debug_assert!(anomaly_count <= total_count);

    let raw = 100.0 - (anomaly_count as f64 / total_count as f64 * 100.0);

    if raw <= 0.0 {
        0
    } else {
        raw.round().min(100.0) as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_no_anomalies_is_perfect() {
        assert_eq!(score(0, 1), 100);
        assert_eq!(score(0, 1000), 100);
    }

    #[test]
    fn test_all_anomalies_is_zero() {
        assert_eq!(score(7, 7), 0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(score(1, 100), 99);
        assert_eq!(score(1, 3), 67);
        assert_eq!(score(2, 3), 33);
        assert_eq!(score(1, 8), 88); // 87.5 rounds up
    }
}
