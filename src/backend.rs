//! Search backend abstraction.
//!
//! The clustering core never talks to a search engine directly. It describes
//! the grouped query it needs ([`GroupedQuery`]) and receives one
//! [`CellResult`] per non-empty geohash cell. [`MemoryBackend`] answers the
//! same query over an in-memory document set.

use crate::error::{ClusterError, Result};
use crate::validation::validate_geographic_point;
use geo::Point;
use geocluster_types::bbox::BoundingBox2D;
use geocluster_types::point::LabeledPoint;
use rustc_hash::FxHashMap;

/// A geo-tagged search document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDocument {
    pub id: String,
    pub label: String,
    pub location: Point<f64>,
}

impl SearchDocument {
    pub fn new(id: impl Into<String>, label: impl Into<String>, location: Point<f64>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            location,
        }
    }

    /// Parse a search-engine style `"lat, lon"` location field.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster::backend::SearchDocument;
    ///
    /// let doc = SearchDocument::from_location_str("7", "Harbour office", "44.65, -63.57").unwrap();
    /// assert_eq!(doc.location.x(), -63.57);
    /// assert_eq!(doc.location.y(), 44.65);
    /// ```
    pub fn from_location_str(
        id: impl Into<String>,
        label: impl Into<String>,
        location: &str,
    ) -> Result<Self> {
        let (lat, lon) = location.split_once(',').ok_or_else(|| {
            ClusterError::InvalidInput(format!("Location {:?} is not \"lat, lon\"", location))
        })?;

        let parse = |s: &str, axis: &str| {
            s.trim().parse::<f64>().map_err(|e| {
                ClusterError::InvalidInput(format!("Bad {} in location {:?}: {}", axis, location, e))
            })
        };
        let point = Point::new(parse(lon, "longitude")?, parse(lat, "latitude")?);
        validate_geographic_point(&point)?;

        Ok(Self::new(id, label, point))
    }

    pub fn to_labeled_point(&self) -> LabeledPoint {
        LabeledPoint::new(self.id.clone(), self.label.clone(), self.location)
    }
}

/// One row of a grouped query: a non-empty geohash cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellResult {
    /// Geohash prefix the documents were grouped on
    pub geohash: String,
    /// Total number of matching documents in the cell
    pub count: u64,
    /// Up to `group_limit` sample documents
    pub documents: Vec<SearchDocument>,
    /// Mean longitude/latitude of all documents in the cell, when requested
    pub mean: Option<Point<f64>>,
}

impl CellResult {
    pub fn new(geohash: impl Into<String>, count: u64) -> Self {
        Self {
            geohash: geohash.into(),
            count,
            documents: Vec::new(),
            mean: None,
        }
    }

    pub fn with_documents(mut self, documents: Vec<SearchDocument>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_mean(mut self, mean: Point<f64>) -> Self {
        self.mean = Some(mean);
        self
    }
}

/// Description of the grouped query the engine needs answered.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedQuery {
    pub bounds: BoundingBox2D,
    /// Prefix length to group on
    pub geohash_length: usize,
    /// Sample documents to return per cell
    pub group_limit: usize,
    /// Cap on returned cells
    pub max_rows: usize,
    /// Include per-cell mean coordinates
    pub with_stats: bool,
    /// Ask for cells in ascending geohash order
    pub sorted: bool,
}

impl GroupedQuery {
    /// Name of the indexed prefix field to group on, e.g. `geohash_5`.
    pub fn group_field(&self) -> String {
        format!("geohash_{}", self.geohash_length)
    }
}

/// Trait for search backends that can group matches by geohash prefix.
pub trait SearchBackend {
    /// Run the grouped query. Errors are logged by the caller and treated as
    /// an empty result.
    fn grouped_cells(&self, query: &GroupedQuery) -> Result<Vec<CellResult>>;
}

impl<T: SearchBackend + ?Sized> SearchBackend for &T {
    fn grouped_cells(&self, query: &GroupedQuery) -> Result<Vec<CellResult>> {
        (**self).grouped_cells(query)
    }
}

impl<T: SearchBackend + ?Sized> SearchBackend for Box<T> {
    fn grouped_cells(&self, query: &GroupedQuery) -> Result<Vec<CellResult>> {
        (**self).grouped_cells(query)
    }
}

/// In-memory search backend.
///
/// Cells come back in first-seen order unless the query asks for sorting,
/// which mirrors a search engine that groups without an explicit sort.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: Vec<SearchDocument>,
}

#[derive(Debug)]
struct CellAccumulator {
    count: u64,
    documents: Vec<SearchDocument>,
    sum_x: f64,
    sum_y: f64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<SearchDocument>) -> Result<Self> {
        let mut backend = Self::new();
        for doc in documents {
            backend.insert(doc)?;
        }
        Ok(backend)
    }

    /// Add a document, rejecting coordinates outside the WGS84 range.
    pub fn insert(&mut self, document: SearchDocument) -> Result<()> {
        validate_geographic_point(&document.location)?;
        self.documents.push(document);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SearchBackend for MemoryBackend {
    fn grouped_cells(&self, query: &GroupedQuery) -> Result<Vec<CellResult>> {
        let mut slots: FxHashMap<String, usize> = FxHashMap::default();
        let mut cells: Vec<(String, CellAccumulator)> = Vec::new();

        for doc in &self.documents {
            if !query.bounds.contains_point(&doc.location) {
                continue;
            }

            let coord = geohash::Coord {
                x: doc.location.x(),
                y: doc.location.y(),
            };
            let hash = geohash::encode(coord, query.geohash_length)?;

            let idx = *slots.entry(hash.clone()).or_insert_with(|| {
                cells.push((
                    hash,
                    CellAccumulator {
                        count: 0,
                        documents: Vec::new(),
                        sum_x: 0.0,
                        sum_y: 0.0,
                    },
                ));
                cells.len() - 1
            });

            let acc = &mut cells[idx].1;
            acc.count += 1;
            acc.sum_x += doc.location.x();
            acc.sum_y += doc.location.y();
            if acc.documents.len() < query.group_limit {
                acc.documents.push(doc.clone());
            }
        }

        if query.sorted {
            cells.sort_by(|a, b| a.0.cmp(&b.0));
        }

        if cells.len() > query.max_rows {
            log::warn!(
                "Grouped query on {} produced {} cells, truncating to {}",
                query.group_field(),
                cells.len(),
                query.max_rows
            );
            cells.truncate(query.max_rows);
        }

        Ok(cells
            .into_iter()
            .map(|(hash, acc)| {
                let mean = query.with_stats.then(|| {
                    Point::new(acc.sum_x / acc.count as f64, acc.sum_y / acc.count as f64)
                });
                CellResult {
                    geohash: hash,
                    count: acc.count,
                    documents: acc.documents,
                    mean,
                }
            })
            .collect())
    }
}
