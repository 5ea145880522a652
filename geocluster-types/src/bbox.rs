use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Longitude limits of the WGS84 coordinate space.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;
/// Latitude limits of the WGS84 coordinate space.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// A 2D axis-aligned bounding box in longitude/latitude degrees.
///
/// This is a wrapper around `geo::Rect`; corner order does not matter on
/// construction since `Rect` normalizes its min and max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(-74.0, 40.7, -73.9, 40.8);
    /// assert!((bbox.width() - 0.1).abs() < 1e-9);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// The whole world, used whenever a request carries no usable bounds.
    pub fn world() -> Self {
        Self::new(MIN_LON, MIN_LAT, MAX_LON, MAX_LAT)
    }

    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Check if a point is contained within this bounding box (edges included).
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// True when the box spans the full longitude and latitude range.
    pub fn is_world(&self) -> bool {
        self.min_x() <= MIN_LON
            && self.max_x() >= MAX_LON
            && self.min_y() <= MIN_LAT
            && self.max_y() >= MAX_LAT
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::world()
    }
}
