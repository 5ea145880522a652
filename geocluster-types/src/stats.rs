use serde::{Deserialize, Serialize};

/// Per-request clustering statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    /// Non-empty geohash cells returned by the backend
    pub input_cells: usize,
    /// Sum of document counts over all input cells
    pub input_documents: u64,
    /// Number of neighbor merges performed by the sweep
    pub merges: usize,
    /// Markers emitted as single points
    pub output_points: usize,
    /// Markers emitted as small groups
    pub output_groups: usize,
    /// Markers emitted as clusters
    pub output_clusters: usize,
    /// Sum of counts over all emitted markers
    pub output_documents: u64,
}

impl ClusterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_input(&mut self, documents: u64) {
        self.input_cells += 1;
        self.input_documents += documents;
    }

    pub fn record_merges(&mut self, merges: usize) {
        self.merges += merges;
    }

    /// Total markers that will be drawn.
    pub fn output_markers(&self) -> usize {
        self.output_points + self.output_groups + self.output_clusters
    }

    /// True when no document was lost or duplicated between input and output.
    pub fn is_conserved(&self) -> bool {
        self.input_documents == self.output_documents
    }
}
