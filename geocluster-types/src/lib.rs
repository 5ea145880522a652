//! # geocluster-types
//!
//! Core marker types shared by the geocluster engine and its callers.
//!
//! - **Marker types**: `LabeledPoint`, `ClusterSummary`
//! - **Bounding box types**: `BoundingBox2D`
//! - **Statistics**: `ClusterStats`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::bbox::BoundingBox2D;
//! use geocluster_types::point::LabeledPoint;
//! use geo::Point;
//!
//! let office = LabeledPoint::new("org-17", "Head office", Point::new(-74.0060, 40.7128));
//!
//! let manhattan = BoundingBox2D::new(-74.0479, 40.6829, -73.9067, 40.8820);
//! assert!(manhattan.contains_point(&office.point));
//! ```

pub mod bbox;
pub mod point;
pub mod stats;
