//! Tolerant parsing of request parameters.
//!
//! Nothing here rejects a request: malformed numbers become safe defaults
//! (zoom 0, full-world bounds) and out-of-range coordinates are clamped.

use crate::resolution::MAX_ZOOM;
use geocluster_types::bbox::{BoundingBox2D, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// One clustering request after parameter cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRequest {
    pub bounds: BoundingBox2D,
    pub zoom: u8,
    /// Whether per-cell means may be requested from the backend
    pub stats: bool,
}

impl ClusterRequest {
    /// Zoom levels past [`MAX_ZOOM`] are clamped.
    pub fn new(bounds: BoundingBox2D, zoom: u8) -> Self {
        Self {
            bounds,
            zoom: zoom.min(MAX_ZOOM),
            stats: true,
        }
    }

    pub fn with_stats(mut self, stats: bool) -> Self {
        self.stats = stats;
        self
    }

    /// Build a request from raw query-string values.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster::request::ClusterRequest;
    ///
    /// let req = ClusterRequest::parse(Some("-200,10,20,95"), Some("abc"), None);
    /// assert_eq!(req.zoom, 0);
    /// assert_eq!(req.bounds.min_x(), -180.0);
    /// assert_eq!(req.bounds.max_y(), 90.0);
    /// assert!(req.stats);
    /// ```
    pub fn parse(bounds: Option<&str>, zoom: Option<&str>, stats: Option<&str>) -> Self {
        Self::new(parse_bounds(bounds), parse_zoom(zoom)).with_stats(parse_stats_flag(stats))
    }
}

/// Parse a longitude, clamping it to [-180, 180].
///
/// Unparseable input falls to the limit on the side of its sign.
pub fn restrict_longitude(raw: &str) -> f64 {
    restrict(raw, MIN_LON, MAX_LON)
}

/// Parse a latitude, clamping it to [-90, 90].
pub fn restrict_latitude(raw: &str) -> f64 {
    restrict(raw, MIN_LAT, MAX_LAT)
}

fn restrict(raw: &str, min: f64, max: f64) -> f64 {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if !value.is_nan() => value.clamp(min, max),
        _ => {
            log::debug!("Unparseable coordinate {:?}, using the nearest limit", raw);
            if raw.starts_with('-') { min } else { max }
        }
    }
}

/// Parse `min_lon,min_lat,max_lon,max_lat`. Missing or malformed input
/// yields the whole world.
pub fn parse_bounds(raw: Option<&str>) -> BoundingBox2D {
    let Some(raw) = raw else {
        return BoundingBox2D::world();
    };

    let parts: Vec<&str> = raw.split(',').collect();
    let [min_lon, min_lat, max_lon, max_lat] = parts.as_slice() else {
        log::warn!(
            "Bounds {:?} do not have four components, using the whole world",
            raw
        );
        return BoundingBox2D::world();
    };

    BoundingBox2D::new(
        restrict_longitude(min_lon),
        restrict_latitude(min_lat),
        restrict_longitude(max_lon),
        restrict_latitude(max_lat),
    )
}

/// Parse a zoom level: missing or malformed input is 0, out of range is clamped.
pub fn parse_zoom(raw: Option<&str>) -> u8 {
    let Some(raw) = raw else {
        return 0;
    };

    match raw.trim().parse::<i64>() {
        Ok(zoom) => zoom.clamp(0, MAX_ZOOM as i64) as u8,
        Err(e) => {
            log::warn!("Invalid zoom {:?} ({}), using 0", raw, e);
            0
        }
    }
}

/// Stats are on unless explicitly switched off.
pub fn parse_stats_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), None | Some("null") | Some("true"))
}
