use geo::Point;
use serde::{Deserialize, Serialize};

/// A single search result rendered as its own marker.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::LabeledPoint;
/// use geo::Point;
///
/// let cafe = LabeledPoint::new("42", "Corner Cafe", Point::new(-73.99, 40.73));
/// assert_eq!(cafe.label, "Corner Cafe");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// Identifier of the underlying document
    pub id: String,
    /// Human readable label (popup content)
    pub label: String,
    /// Location as longitude/latitude
    pub point: Point<f64>,
}

impl LabeledPoint {
    pub fn new(id: impl Into<String>, label: impl Into<String>, point: Point<f64>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            point,
        }
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }
}

/// An aggregate marker: how many documents it stands for and where to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Number of documents represented
    pub count: u64,
    /// Representative coordinate (weighted centroid, statistical mean or cell center)
    pub centroid: Point<f64>,
}

impl ClusterSummary {
    pub fn new(count: u64, centroid: Point<f64>) -> Self {
        Self { count, centroid }
    }
}
