//! Request-scoped clustering pipeline.
//!
//! request → grouped backend query → ingestion → neighbor sweep → layers.
//! Everything after the backend call is synchronous and in memory.

use crate::backend::{CellResult, GroupedQuery, SearchBackend};
use crate::builder::ClustererBuilder;
use crate::config::Config;
use crate::error::{ClusterError, Result};
use crate::ingest::GroupIngestor;
use crate::partition::{ClusterLayers, partition};
use crate::request::ClusterRequest;
use crate::resolution::resolution_table;
use crate::sweep::NeighborMergeEngine;
use geocluster_types::stats::ClusterStats;

/// Layers produced for one request plus what it took to produce them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterOutcome {
    pub layers: ClusterLayers,
    pub stats: ClusterStats,
}

/// Clustering engine holding immutable configuration.
///
/// # Examples
///
/// ```rust
/// use geocluster::{Clusterer, ClusterRequest, MemoryBackend, SearchDocument};
/// use geocluster::request::parse_bounds;
/// use geo::Point;
///
/// let backend = MemoryBackend::with_documents(vec![
///     SearchDocument::new("1", "Halifax", Point::new(-63.57, 44.65)),
///     SearchDocument::new("2", "Dartmouth", Point::new(-63.57, 44.67)),
///     SearchDocument::new("3", "Vancouver", Point::new(-123.12, 49.28)),
/// ])?;
///
/// let clusterer = Clusterer::new(Default::default())?;
/// let request = ClusterRequest::new(parse_bounds(None), 3);
/// let outcome = clusterer.cluster(&backend, &request)?;
///
/// assert_eq!(outcome.layers.document_count(), 3);
/// assert_eq!(outcome.layers.clusters.len(), 1);
/// assert_eq!(outcome.layers.points.len(), 1);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Clusterer {
    config: Config,
}

impl Clusterer {
    pub fn new(config: Config) -> Result<Self> {
        config.validate().map_err(ClusterError::Config)?;
        Ok(Self { config })
    }

    pub fn builder() -> ClustererBuilder {
        ClustererBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The grouped query that answers `request`.
    pub fn query_for(&self, request: &ClusterRequest) -> GroupedQuery {
        GroupedQuery {
            bounds: request.bounds.clone(),
            geohash_length: resolution_table().geohash_length(request.zoom),
            group_limit: self.config.max_group_size(request.zoom),
            max_rows: self.config.max_rows,
            with_stats: self.config.stats_enabled && request.stats,
            sorted: self.config.backend_sorted,
        }
    }

    /// Run the full pipeline against `backend`.
    ///
    /// A failing backend is logged and treated as returning no cells, so the
    /// caller gets three empty layers rather than an error. Errors returned
    /// from here are invariant violations inside the engine.
    pub fn cluster<B: SearchBackend + ?Sized>(
        &self,
        backend: &B,
        request: &ClusterRequest,
    ) -> Result<ClusterOutcome> {
        let query = self.query_for(request);
        let rows = match backend.grouped_cells(&query) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!(
                    "Grouped query on {} failed, rendering no markers: {}",
                    query.group_field(),
                    e
                );
                Vec::new()
            }
        };

        self.cluster_cells(rows, request.zoom)
    }

    /// Cluster rows that were already fetched for `zoom`.
    pub fn cluster_cells(&self, rows: Vec<CellResult>, zoom: u8) -> Result<ClusterOutcome> {
        let max_group_size = self.config.max_group_size(zoom);
        let mut stats = ClusterStats::new();

        let mut index =
            GroupIngestor::new(max_group_size, self.config.backend_sorted).ingest(rows)?;
        for cell in index.cells() {
            stats.record_input(cell.group.count());
        }

        let merges =
            NeighborMergeEngine::new(zoom, max_group_size).sweep_until_stable(&mut index)?;
        stats.record_merges(merges);

        let layers = partition(index)?;
        stats.output_points = layers.points.len();
        stats.output_groups = layers.groups.len();
        stats.output_clusters = layers.clusters.len();
        stats.output_documents = layers.document_count();

        if !stats.is_conserved() {
            return Err(ClusterError::InvariantViolation(format!(
                "{} documents in, {} out",
                stats.input_documents, stats.output_documents
            )));
        }

        log::debug!(
            "Clustered {} cells ({} documents) at zoom {} into {} markers",
            stats.input_cells,
            stats.input_documents,
            zoom,
            stats.output_markers()
        );

        Ok(ClusterOutcome { layers, stats })
    }
}
