//! Point groups: the unit the merge sweep works on.
//!
//! A group is one of three renderable shapes. `Empty` only exists while a
//! group is being moved out of its slot during a merge.

use crate::error::{ClusterError, Result};
use geo::Point;
use geocluster_types::point::{ClusterSummary, LabeledPoint};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointGroup {
    #[default]
    Empty,
    /// One document drawn as its own marker
    Single(LabeledPoint),
    /// A handful of documents drawn individually but kept together
    Grouped(Vec<LabeledPoint>),
    /// Too many documents to draw; only a count and a centroid survive
    Cluster(ClusterSummary),
}

impl PointGroup {
    pub fn cluster(count: u64, centroid: Point<f64>) -> Self {
        PointGroup::Cluster(ClusterSummary::new(count, centroid))
    }

    /// Build a single or grouped variant from a list of points.
    pub fn from_points(mut points: Vec<LabeledPoint>) -> Self {
        match points.len() {
            0 => PointGroup::Empty,
            1 => PointGroup::Single(points.remove(0)),
            _ => PointGroup::Grouped(points),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PointGroup::Empty)
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, PointGroup::Cluster(_))
    }

    /// Number of documents this group stands for.
    pub fn count(&self) -> u64 {
        match self {
            PointGroup::Empty => 0,
            PointGroup::Single(_) => 1,
            PointGroup::Grouped(points) => points.len() as u64,
            PointGroup::Cluster(summary) => summary.count,
        }
    }

    /// The coordinate used for distance checks and centroid weighting.
    ///
    /// Grouped points are anchored on their first member.
    pub fn representative_point(&self) -> Result<Point<f64>> {
        match self {
            PointGroup::Empty => Err(ClusterError::InvariantViolation(
                "empty group has no representative point".to_string(),
            )),
            PointGroup::Single(p) => Ok(p.point),
            PointGroup::Grouped(points) => points.first().map(|p| p.point).ok_or_else(|| {
                ClusterError::InvariantViolation("grouped points with no members".to_string())
            }),
            PointGroup::Cluster(summary) => Ok(summary.centroid),
        }
    }

    /// Absorb `other` into `self`.
    ///
    /// `other` is consumed. The result is a cluster whenever either side
    /// already is one or when the combined count exceeds `max_group_size`;
    /// otherwise the member lists are concatenated, `self` first.
    pub fn merge_into(&mut self, other: PointGroup, max_group_size: usize) -> Result<()> {
        if self.is_empty() || other.is_empty() {
            return Err(ClusterError::InvariantViolation(
                "merge involving an empty group".to_string(),
            ));
        }

        let count = self.count();
        let other_count = other.count();
        let total = count + other_count;

        if self.is_cluster() || other.is_cluster() || total > max_group_size as u64 {
            let centroid = weighted_centroid(
                self.representative_point()?,
                count,
                other.representative_point()?,
                other_count,
            );
            *self = PointGroup::cluster(total, centroid);
            return Ok(());
        }

        let points = match (std::mem::take(self), other) {
            (PointGroup::Single(a), PointGroup::Single(b)) => vec![a, b],
            (PointGroup::Single(a), PointGroup::Grouped(rest)) => {
                let mut points = Vec::with_capacity(rest.len() + 1);
                points.push(a);
                points.extend(rest);
                points
            }
            (PointGroup::Grouped(mut points), PointGroup::Single(b)) => {
                points.push(b);
                points
            }
            (PointGroup::Grouped(mut points), PointGroup::Grouped(rest)) => {
                points.extend(rest);
                points
            }
            (original, _) => {
                *self = original;
                return Err(ClusterError::InvariantViolation(
                    "cluster reached the point list merge".to_string(),
                ));
            }
        };
        *self = PointGroup::Grouped(points);
        Ok(())
    }
}

/// Count-weighted mean of two points, computed per axis in degrees.
///
/// Longitudes more than 180° apart are averaged the short way round the
/// antimeridian.
pub fn weighted_centroid(a: Point<f64>, a_count: u64, b: Point<f64>, b_count: u64) -> Point<f64> {
    let total = (a_count + b_count) as f64;
    let (wa, wb) = (a_count as f64, b_count as f64);

    let mut bx = b.x();
    if bx - a.x() > 180.0 {
        bx -= 360.0;
    } else if a.x() - bx > 180.0 {
        bx += 360.0;
    }

    let mut x = (a.x() * wa + bx * wb) / total;
    if x < -180.0 {
        x += 360.0;
    } else if x > 180.0 {
        x -= 360.0;
    }

    Point::new(x, (a.y() * wa + b.y() * wb) / total)
}
