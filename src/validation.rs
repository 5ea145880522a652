//! Validation for coordinates and geohash prefixes.

use crate::error::{ClusterError, Result};
use crate::resolution::MAX_GEOHASH_LENGTH;
use geo::Point;
use geocluster_types::bbox::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Rejects document locations that are not finite or lie off the globe.
///
/// ```
/// use geocluster::validation::validate_geographic_point;
/// use geo::Point;
///
/// assert!(validate_geographic_point(&Point::new(-63.57, 44.65)).is_ok());
/// assert!(validate_geographic_point(&Point::new(-63.57, f64::NAN)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    check_axis("longitude", point.x(), MIN_LON, MAX_LON)?;
    check_axis("latitude", point.y(), MIN_LAT, MAX_LAT)
}

fn check_axis(axis: &str, value: f64, min: f64, max: f64) -> Result<()> {
    // NaN fails the range check too
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ClusterError::InvalidInput(format!(
            "{} {} outside [{}, {}]",
            axis, value, min, max
        )))
    }
}

/// A usable cell prefix: 1 to 12 characters from the geohash alphabet.
pub fn validate_geohash(prefix: &str) -> Result<()> {
    if prefix.is_empty() || prefix.len() > MAX_GEOHASH_LENGTH {
        return Err(ClusterError::InvalidInput(format!(
            "Geohash prefix length must be between 1 and {}, got {:?}",
            MAX_GEOHASH_LENGTH, prefix
        )));
    }

    geohash::decode_bbox(prefix)?;
    Ok(())
}
