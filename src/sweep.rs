//! Single-pass neighbor merge over geohash cells.
//!
//! Cells are visited in ascending geohash order. Each live cell looks only at
//! its four forward neighbors (top-left, top, top-right, right) and absorbs
//! those whose representative points are within the merge distance on
//! screen. Geohash order is a Z-order curve, so anything above or to the
//! right of a cell sorts after it; looking forward is enough to get a
//! bounded, backtrack-free pass with one hash lookup per neighbor.
//! The exception is the right-hand wrap at ±180°, whose target sorts earlier;
//! it is merged like any other live neighbor.

use crate::error::Result;
use crate::ingest::CellIndex;
use crate::resolution::{MERGE_DISTANCE_PIXELS, resolution_table};
use geo::{Distance, Haversine, Point};
use geocluster_types::bbox::MAX_LAT;

/// Forward steps as `(cells north, cells east)`, in the order they are
/// checked: top-left, top, top-right, right.
const FORWARD: [(f64, f64); 4] = [(1.0, -1.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Latitude correction for Mercator pixel stretch.
///
/// An empirical linear fit: exact at the equator and at 47.99° where 223.27
/// haversine-derived pixels measure 335 on screen. It is not a projection
/// formula and over-corrects near the poles.
pub fn pixel_correction(lat: f64) -> f64 {
    1.0 + (335.0 / 223.271875276 - 1.0) * (lat.abs() / 47.9899)
}

/// Approximate on-screen distance between two points, in pixels.
///
/// The correction uses the latitude of `a`, so the measure is not symmetric.
pub fn pixel_distance(a: Point<f64>, b: Point<f64>, meters_per_pixel: f64) -> f64 {
    Haversine.distance(a, b) / meters_per_pixel * pixel_correction(a.y())
}

pub fn should_merge(a: Point<f64>, b: Point<f64>, meters_per_pixel: f64) -> bool {
    pixel_distance(a, b, meters_per_pixel) <= MERGE_DISTANCE_PIXELS
}

/// Top-left, top, top-right and right neighbors of a cell, same length.
///
/// Longitude wraps, so a cell touching +180° has the cells at -180° as its
/// right-hand neighbors. Latitude does not: cells on the north edge have no
/// neighbor above them.
pub fn forward_neighbors(hash: &str) -> [Option<String>; 4] {
    let Ok((center, lon_err, lat_err)) = geohash::decode(hash) else {
        return Default::default();
    };

    FORWARD.map(|(north, east)| {
        let y = center.y + 2.0 * lat_err * north;
        if y > MAX_LAT {
            return None;
        }
        let x = (center.x + 2.0 * lon_err * east + 180.0).rem_euclid(360.0) - 180.0;
        geohash::encode(geohash::Coord { x, y }, hash.len()).ok()
    })
}

/// Merges close forward-adjacent cells for one zoom level.
#[derive(Debug, Clone, Copy)]
pub struct NeighborMergeEngine {
    zoom: u8,
    meters_per_pixel: f64,
    max_group_size: usize,
}

impl NeighborMergeEngine {
    pub fn new(zoom: u8, max_group_size: usize) -> Self {
        Self {
            zoom,
            meters_per_pixel: resolution_table().meters_per_pixel(zoom),
            max_group_size,
        }
    }

    /// Run one sweep over `index`, returning the number of merges.
    ///
    /// Absorbed cells are flagged during the pass and dropped at the end.
    /// Both the outer walk and the neighbor lookup skip flagged cells, since
    /// a cell may be absorbed before the walk reaches it.
    pub fn sweep(&self, index: &mut CellIndex) -> Result<usize> {
        let mut removed = vec![false; index.len()];
        let mut merges = 0;

        for i in 0..index.len() {
            if removed[i] {
                continue;
            }

            for neighbor in forward_neighbors(&index.cells()[i].geohash).iter().flatten() {
                let Some(j) = index.position(neighbor) else {
                    continue;
                };
                if j == i || removed[j] {
                    continue;
                }

                let cells = index.cells_mut();
                let here = cells[i].group.representative_point()?;
                let there = cells[j].group.representative_point()?;
                if !should_merge(here, there, self.meters_per_pixel) {
                    continue;
                }

                let absorbed = std::mem::take(&mut cells[j].group);
                cells[i].group.merge_into(absorbed, self.max_group_size)?;
                removed[j] = true;
                merges += 1;
            }
        }

        index.remove_flagged(&removed);
        log::debug!(
            "Neighbor sweep at zoom {}: {} merges, {} cells left",
            self.zoom,
            merges,
            index.len()
        );
        Ok(merges)
    }

    /// Sweep until a pass makes no merge, returning the total merge count.
    ///
    /// A merge that yields a cluster moves its centroid, which can bring a
    /// neighbor that was rejected earlier in the pass within range. Repeating
    /// until nothing changes leaves an index on which `sweep` is a no-op.
    /// Every merge removes a cell, so this terminates.
    pub fn sweep_until_stable(&self, index: &mut CellIndex) -> Result<usize> {
        let mut total = 0;
        loop {
            let merges = self.sweep(index)?;
            if merges == 0 {
                return Ok(total);
            }
            total += merges;
        }
    }
}
