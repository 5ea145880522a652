//! Zoom-adaptive clustering of geo-tagged search results into map markers.
//!
//! ## Features
//! - **Resolution table**: zoom → meters per pixel → geohash prefix length
//! - **Typed groups**: single points, small groups and count/centroid clusters
//! - **Forward neighbor sweep**: one pass over geohash-ordered cells, no
//!   pairwise distance matrix
//! - **Tolerant requests**: malformed bounds and zoom fall back to safe defaults
//!
//! ```rust
//! use geocluster::{Clusterer, ClusterRequest, MemoryBackend, SearchDocument};
//! use geo::Point;
//!
//! let mut backend = MemoryBackend::new();
//! backend.insert(SearchDocument::new("1", "Library", Point::new(-73.9822, 40.7532)))?;
//! backend.insert(SearchDocument::new("2", "Museum", Point::new(-73.9632, 40.7794)))?;
//!
//! let clusterer = Clusterer::builder().group_sizes(1, 10).build()?;
//! let request = ClusterRequest::parse(Some("-74.1,40.6,-73.8,40.9"), Some("16"), None);
//! let outcome = clusterer.cluster(&backend, &request)?;
//!
//! assert_eq!(outcome.layers.points.len(), 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```

pub mod backend;
pub mod builder;
pub mod clusterer;
pub mod config;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod group;
pub mod ingest;
pub mod partition;
pub mod request;
pub mod resolution;
pub mod sweep;
pub mod validation;

pub use builder::ClustererBuilder;
pub use clusterer::{ClusterOutcome, Clusterer};
pub use config::Config;
pub use error::{ClusterError, Result};

pub use backend::{CellResult, GroupedQuery, MemoryBackend, SearchBackend, SearchDocument};
pub use group::PointGroup;
pub use ingest::{CellIndex, GroupIngestor};
pub use partition::{ClusterLayers, partition};
pub use request::ClusterRequest;
pub use resolution::{ResolutionTable, ZoomResolution, resolution_table};
pub use sweep::NeighborMergeEngine;

pub use geo::Point;
pub use geocluster_types::bbox::BoundingBox2D;
pub use geocluster_types::point::{ClusterSummary, LabeledPoint};
pub use geocluster_types::stats::ClusterStats;

/// Common imports
pub mod prelude {
    pub use crate::{ClusterError, Clusterer, ClustererBuilder, Config, Result};

    pub use crate::{BoundingBox2D, ClusterLayers, ClusterRequest, Point};

    pub use crate::{MemoryBackend, SearchBackend, SearchDocument};
}
