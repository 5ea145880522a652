//! Splitting merged groups into the three marker layers.

use crate::error::{ClusterError, Result};
use crate::group::PointGroup;
use crate::ingest::CellIndex;
use geocluster_types::point::{ClusterSummary, LabeledPoint};
use serde::{Deserialize, Serialize};

/// Renderable output of one clustering request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterLayers {
    /// Documents drawn on their own
    pub points: Vec<LabeledPoint>,
    /// Small sets drawn member by member; each inner list is one set
    pub groups: Vec<Vec<LabeledPoint>>,
    /// Aggregates drawn as a count at a centroid
    pub clusters: Vec<ClusterSummary>,
}

impl ClusterLayers {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.groups.is_empty() && self.clusters.is_empty()
    }

    /// Number of markers across all layers.
    pub fn marker_count(&self) -> usize {
        self.points.len() + self.groups.len() + self.clusters.len()
    }

    /// Number of documents represented across all layers.
    pub fn document_count(&self) -> u64 {
        self.points.len() as u64
            + self.groups.iter().map(|g| g.len() as u64).sum::<u64>()
            + self.clusters.iter().map(|c| c.count).sum::<u64>()
    }

    /// Add one surviving group to its layer.
    pub fn push(&mut self, group: PointGroup) -> Result<()> {
        match group {
            PointGroup::Single(point) => self.points.push(point),
            PointGroup::Grouped(points) => self.groups.push(points),
            PointGroup::Cluster(summary) => self.clusters.push(summary),
            PointGroup::Empty => {
                return Err(ClusterError::InvariantViolation(
                    "empty group reached the output".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Consume the merged index, sorting every group into its layer.
pub fn partition(index: CellIndex) -> Result<ClusterLayers> {
    let mut layers = ClusterLayers::default();
    for cell in index.into_cells() {
        layers.push(cell.group)?;
    }
    Ok(layers)
}
