//! Turning grouped search results into an ordered index of point groups.
//!
//! The merge sweep relies on visiting cells in ascending geohash order, so
//! [`CellIndex`] guarantees that order at construction instead of leaning on
//! whatever container or backend happened to produce the rows.

use crate::backend::CellResult;
use crate::error::Result;
use crate::group::PointGroup;
use crate::validation::validate_geohash;
use geo::Point;
use rustc_hash::FxHashMap;

/// A non-empty geohash cell and the group currently living in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub geohash: String,
    pub group: PointGroup,
}

/// Geohash-ascending cells with O(1) lookup by prefix.
#[derive(Debug, Clone, Default)]
pub struct CellIndex {
    cells: Vec<Cell>,
    positions: FxHashMap<String, usize>,
}

impl CellIndex {
    /// Build an index from `(prefix, group)` pairs.
    ///
    /// When `presorted` is set the order is checked in one pass and repaired
    /// if it is wrong. Duplicate prefixes are folded into their first
    /// occurrence using the normal merge rule.
    pub fn from_groups(
        mut entries: Vec<(String, PointGroup)>,
        presorted: bool,
        max_group_size: usize,
    ) -> Result<Self> {
        let in_order = entries.windows(2).all(|w| w[0].0 <= w[1].0);
        if !in_order {
            if presorted {
                log::warn!(
                    "Backend promised geohash-ordered cells but returned them out of order; re-sorting {} cells",
                    entries.len()
                );
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut cells: Vec<Cell> = Vec::with_capacity(entries.len());
        for (geohash, group) in entries {
            match cells.last_mut() {
                Some(last) if last.geohash == geohash => {
                    log::warn!("Duplicate geohash cell {} from backend, merging", geohash);
                    last.group.merge_into(group, max_group_size)?;
                }
                _ => cells.push(Cell { geohash, group }),
            }
        }

        let positions = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.geohash.clone(), i))
            .collect();

        Ok(Self { cells, positions })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn position(&self, geohash: &str) -> Option<usize> {
        self.positions.get(geohash).copied()
    }

    pub fn get(&self, geohash: &str) -> Option<&PointGroup> {
        self.position(geohash).map(|i| &self.cells[i].group)
    }

    /// Cells in ascending geohash order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Sum of document counts over all cells.
    pub fn total_count(&self) -> u64 {
        self.cells.iter().map(|c| c.group.count()).sum()
    }

    /// Drop every cell whose flag is set, keeping the order of the rest.
    pub(crate) fn remove_flagged(&mut self, removed: &[bool]) {
        let mut idx = 0;
        self.cells.retain(|_| {
            let keep = !removed.get(idx).copied().unwrap_or(false);
            idx += 1;
            keep
        });
        self.positions = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.geohash.clone(), i))
            .collect();
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Converts backend cell rows into point groups for one zoom level.
#[derive(Debug, Clone, Copy)]
pub struct GroupIngestor {
    max_group_size: usize,
    backend_sorted: bool,
}

impl GroupIngestor {
    pub fn new(max_group_size: usize, backend_sorted: bool) -> Self {
        Self {
            max_group_size,
            backend_sorted,
        }
    }

    /// Build the ordered index for a full grouped result.
    pub fn ingest(&self, rows: Vec<CellResult>) -> Result<CellIndex> {
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let geohash = row.geohash.clone();
            if let Some(group) = self.group_for_cell(row)? {
                entries.push((geohash, group));
            }
        }
        CellIndex::from_groups(entries, self.backend_sorted, self.max_group_size)
    }

    /// Group for one backend row, or `None` when the row is dropped.
    ///
    /// A row needs `count` sample documents to be drawn point by point; a
    /// backend that sent fewer gets a cluster instead so no document is lost.
    pub fn group_for_cell(&self, row: CellResult) -> Result<Option<PointGroup>> {
        if row.count == 0 {
            return Ok(None);
        }

        if let Err(e) = validate_geohash(&row.geohash) {
            log::warn!("Dropping cell with {} documents: {}", row.count, e);
            return Ok(None);
        }

        let count = row.count;
        let fits_in_group = count <= self.max_group_size as u64;

        if fits_in_group && row.documents.len() as u64 >= count {
            let points = row
                .documents
                .iter()
                .take(count as usize)
                .map(|doc| doc.to_labeled_point())
                .collect();
            return Ok(Some(PointGroup::from_points(points)));
        }

        if fits_in_group {
            log::warn!(
                "Cell {} reports {} documents but only {} were returned; clustering it",
                row.geohash,
                count,
                row.documents.len()
            );
        }

        let centroid = match row.mean {
            Some(mean) => mean,
            None => cell_center(&row.geohash)?,
        };
        Ok(Some(PointGroup::cluster(count, centroid)))
    }
}

/// Center of a geohash cell as a longitude/latitude point.
pub fn cell_center(geohash: &str) -> Result<Point<f64>> {
    let (coord, _, _) = geohash::decode(geohash)?;
    Ok(Point::new(coord.x, coord.y))
}
