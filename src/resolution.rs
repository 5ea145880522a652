//! Zoom level → ground resolution → geohash prefix length.
//!
//! The table is derived from spherical Mercator math with 256 pixel tiles
//! and is computed once per process:
//!
//! ```rust
//! use geocluster::resolution::{resolution_table, MAX_ZOOM};
//!
//! let table = resolution_table();
//! assert_eq!(table.len(), MAX_ZOOM as usize + 1);
//! assert!(table.geohash_length(15) >= table.geohash_length(5));
//! ```

use crate::error::Result;
use once_cell::sync::Lazy;
use std::f64::consts::PI;

/// Highest zoom level the table covers.
pub const MAX_ZOOM: u8 = 30;

/// Screen distance (pixels) under which two markers are merged.
pub const MERGE_DISTANCE_PIXELS: f64 = 65.0;

/// Spherical Mercator earth radius in meters (EPSG:3857).
pub const MERCATOR_RADIUS: f64 = 6_378_137.0;

pub const PIXELS_PER_TILE: f64 = 256.0;

/// Meters per pixel at zoom 0: the equator spread over a single tile.
pub const MAX_RESOLUTION: f64 = 2.0 * PI * MERCATOR_RADIUS / PIXELS_PER_TILE;

/// Longest prefix the `geohash` crate will encode.
pub const MAX_GEOHASH_LENGTH: usize = 12;

static TABLE: Lazy<ResolutionTable> = Lazy::new(|| ResolutionTable::build(MAX_ZOOM));

/// The process-wide table, built on first use.
pub fn resolution_table() -> &'static ResolutionTable {
    &TABLE
}

/// Resolution data for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomResolution {
    pub zoom: u8,
    pub meters_per_pixel: f64,
    /// Geohash prefix length whose cells are no larger than the merge distance
    pub geohash_length: usize,
}

/// Immutable per-zoom resolution table.
#[derive(Debug, Clone)]
pub struct ResolutionTable {
    levels: Vec<ZoomResolution>,
}

impl ResolutionTable {
    /// Build the table for zoom levels `0..=max_zoom`.
    pub fn build(max_zoom: u8) -> Self {
        let levels = (0..=max_zoom)
            .map(|zoom| {
                let meters_per_pixel = MAX_RESOLUTION / 2f64.powi(zoom as i32);
                ZoomResolution {
                    zoom,
                    meters_per_pixel,
                    geohash_length: length_from_distance(meters_per_pixel),
                }
            })
            .collect();

        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn max_zoom(&self) -> u8 {
        self.levels.last().map(|l| l.zoom).unwrap_or(0)
    }

    pub fn get(&self, zoom: u8) -> Option<&ZoomResolution> {
        self.levels.get(zoom as usize)
    }

    /// Resolution for `zoom`, saturating at the deepest level.
    pub fn level(&self, zoom: u8) -> ZoomResolution {
        let idx = (zoom as usize).min(self.levels.len().saturating_sub(1));
        self.levels[idx]
    }

    pub fn meters_per_pixel(&self, zoom: u8) -> f64 {
        self.level(zoom).meters_per_pixel
    }

    pub fn geohash_length(&self, zoom: u8) -> usize {
        self.level(zoom).geohash_length
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoomResolution> {
        self.levels.iter()
    }
}

/// Inverse spherical Mercator: projected meters to `(lon, lat)` degrees.
pub fn backward_mercator(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / MERCATOR_RADIUS).to_degrees();
    let lat = (PI * 0.5 - 2.0 * (-y / MERCATOR_RADIUS).exp().atan()).to_degrees();
    (lon, lat)
}

/// Width and height in degrees of a geohash cell with `len` characters.
pub fn cell_size(len: usize) -> Result<(f64, f64)> {
    let rect = geohash::decode_bbox(&"0".repeat(len.clamp(1, MAX_GEOHASH_LENGTH)))?;
    Ok((rect.width(), rect.height()))
}

/// Shortest geohash prefix whose cells fit inside the merge distance at the
/// given resolution (meters per pixel).
pub fn length_from_distance(meters_per_pixel: f64) -> usize {
    let distance = MERGE_DISTANCE_PIXELS * meters_per_pixel;
    let (lon_span, lat_span) = backward_mercator(distance, distance);

    (1..=MAX_GEOHASH_LENGTH)
        .find(|&len| {
            matches!(cell_size(len), Ok((width, height)) if width <= lon_span && height <= lat_span)
        })
        .unwrap_or(MAX_GEOHASH_LENGTH)
}
