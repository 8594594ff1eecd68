/*!
 * Validation and cleaning of raw records.
 *
 * Each field is coerced to a number. Records where `lat`, `lng` or `spd` can't be coerced are
 * dropped. `alt` and `azm` default to zero when they are missing or empty, but if they are present
 * and not numeric the record is dropped too. Speeds are converted from m/s to km/h and then range
 * checked. Input order is preserved.
 */

use crate::{point::MPS_TO_KMH, PipelineConfig, Point, RawPoint, TraceSightError};
use serde::Serialize;
use serde_json::Value;

/// The cleaned points along with counts of what was thrown away.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    /// Points that passed, in input order.
    pub points: Vec<Point>,
    /// Records with a field that could not be coerced to a finite number.
    pub dropped_malformed: usize,
    /// Records with a speed outside the accepted range.
    pub dropped_out_of_range: usize,
}

impl CleanReport {
    /// Total number of records dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.dropped_malformed + self.dropped_out_of_range
    }
}

/// Result of coercing a single raw field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Coerced {
    Missing,
    Number(f64),
    Invalid,
}

fn coerce(val: &Value) -> Coerced {
    match val {
        Value::Null => Coerced::Missing,
        Value::Number(n) => n.as_f64().map_or(Coerced::Invalid, Coerced::Number),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Coerced::Missing
            } else {
                s.parse::<f64>().map_or(Coerced::Invalid, Coerced::Number)
            }
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Coerced::Invalid,
    }
}

fn required(val: &Value) -> Option<f64> {
    match coerce(val) {
        Coerced::Number(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

fn defaulted(val: &Value) -> Option<f64> {
    match coerce(val) {
        Coerced::Missing => Some(0.0),
        Coerced::Number(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Coerce the fields of a raw record, `None` if any field is unusable.
fn coerce_point(raw: &RawPoint) -> Option<Point> {
    let lat = required(&raw.lat)?;
    let lng = required(&raw.lng)?;
    let speed = required(&raw.spd)? * MPS_TO_KMH;
    let alt = defaulted(&raw.alt)?;
    let heading = defaulted(&raw.azm)?;

    let pnt = Point {
        id: raw.id_string(),
        lat,
        lng,
        alt,
        speed,
        heading,
    };

    // The unit conversion can overflow a huge but finite speed.
    pnt.is_finite().then(|| pnt)
}

fn speed_in_range(pnt: &Point, config: &PipelineConfig) -> bool {
    pnt.speed >= 0.0 && pnt.speed <= config.max_speed_kmh
}

/**
 * Clean a batch of raw records.
 *
 * #Returns
 * The report with all surviving points, or `TraceSightError::NoValidData` if none survived.
 */
pub fn clean(raw: &[RawPoint], config: &PipelineConfig) -> Result<CleanReport, TraceSightError> {
    let mut report = CleanReport {
        points: Vec::with_capacity(raw.len()),
        dropped_malformed: 0,
        dropped_out_of_range: 0,
    };

    for rec in raw {
        match coerce_point(rec) {
            None => report.dropped_malformed += 1,
            Some(pnt) if !speed_in_range(&pnt, config) => report.dropped_out_of_range += 1,
            Some(pnt) => report.points.push(pnt),
        }
    }

    log::debug!(
        "cleaned {} records: kept {}, malformed {}, out of range {}",
        raw.len(),
        report.points.len(),
        report.dropped_malformed,
        report.dropped_out_of_range
    );

    if report.points.is_empty() {
        return Err(TraceSightError::NoValidData { total: raw.len() });
    }

    Ok(report)
}

/// Re-apply the cleaning filters to points that are already canonical.
///
/// Since every point produced by [clean] passes these filters, running this on the output of
/// [clean] returns the same sequence.
pub fn retain_valid(points: &[Point], config: &PipelineConfig) -> Vec<Point> {
    points
        .iter()
        .filter(|p| p.is_finite() && speed_in_range(p, config))
        .cloned()
        .collect()
}
