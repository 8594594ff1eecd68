/*!
 * All the data related to a single location fix in a trace.
 *
 * A RawPoint is a record exactly as it arrived from the input source, nothing about it has been
 * checked. A Point is the canonical, validated form that the rest of the crate works with.
 */

use crate::TraceSightError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Factor to convert a speed in meters per second to kilometers per hour.
pub const MPS_TO_KMH: f64 = 3.6;

/**
 * An unvalidated location record.
 *
 * Every field is kept as an untyped JSON value since the source may give numbers, numeric strings,
 * empty strings, or garbage. Missing fields deserialize to `Value::Null`.
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Opaque identifier of the device or trip that produced this fix.
    #[serde(default)]
    pub randomized_id: Value,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: Value,
    /// Longitude in degrees.
    #[serde(default)]
    pub lng: Value,
    /// Altitude in meters.
    #[serde(default)]
    pub alt: Value,
    /// Speed in meters per second.
    #[serde(default)]
    pub spd: Value,
    /// Azimuth (heading) in degrees.
    #[serde(default)]
    pub azm: Value,
}

impl RawPoint {
    /**
     * Split a parsed JSON document into raw records.
     *
     * The top level must be an array. Array elements that are not objects are kept as empty
     * records so they are counted (and dropped) by the cleaner instead of failing the whole batch.
     *
     * #Returns
     * `TraceSightError::InvalidInputShape` if the document is not an array.
     */
    pub fn list_from_json(doc: Value) -> Result<Vec<RawPoint>, TraceSightError> {
        let items = match doc {
            Value::Array(items) => items,
            other => {
                return Err(TraceSightError::InvalidInputShape {
                    found: json_type_name(&other),
                })
            }
        };

        let raw = items
            .into_iter()
            .map(|item| match item {
                obj @ Value::Object(_) => {
                    serde_json::from_value::<RawPoint>(obj).unwrap_or_default()
                }
                _ => RawPoint::default(),
            })
            .collect();

        Ok(raw)
    }

    /// Render the opaque identifier as a string.
    pub fn id_string(&self) -> String {
        match &self.randomized_id {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&Point> for RawPoint {
    /// Convert back to the raw form, speed goes back to meters per second.
    ///
    /// The round trip through [clean](fn@crate::clean) is not exact for speed: dividing and then
    /// multiplying by 3.6 can move it by one unit in the last place. It never leaves the accepted
    /// range since both steps round monotonically. Every other field comes back unchanged.
    fn from(pnt: &Point) -> Self {
        RawPoint {
            randomized_id: Value::String(pnt.id.clone()),
            lat: Value::from(pnt.lat),
            lng: Value::from(pnt.lng),
            alt: Value::from(pnt.alt),
            spd: Value::from(pnt.speed / MPS_TO_KMH),
            azm: Value::from(pnt.heading),
        }
    }
}

/**
 * A cleaned location fix.
 *
 * Every point that comes out of the cleaner has finite fields and a speed inside the accepted
 * range. Nothing in the crate modifies a point after it is created.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// The identifier from the raw record.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Altitude in meters, 0 if the source did not have one.
    pub alt: f64,
    /// Speed in kilometers per hour.
    pub speed: f64,
    /// Heading in degrees, 0 if the source did not have one.
    pub heading: f64,
}

impl Point {
    /// Check that every field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.alt.is_finite()
            && self.speed.is_finite()
            && self.heading.is_finite()
    }
}

fn json_type_name(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
