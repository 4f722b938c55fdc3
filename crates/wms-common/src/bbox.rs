//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, etc.), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build a box around a center point from its half extents.
    pub fn from_center(center_x: f64, center_y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            min_x: center_x - half_width,
            min_y: center_y - half_height,
            max_x: center_x + half_width,
            max_y: center_y + half_height,
        }
    }

    /// Build a box from the two diagonal corners `(min_x, min_y)` and `(max_x, max_y)`.
    ///
    /// The corners are taken as given, without reordering. Reprojected boxes
    /// keep the corner order of the source box.
    pub fn from_corners(lower_left: (f64, f64), upper_right: (f64, f64)) -> Self {
        Self::new(lower_left.0, lower_left.1, upper_right.0, upper_right.1)
    }

    /// Parse a WMS BBOX parameter string: "minx,miny,maxx,maxy"
    pub fn from_wms_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0_f64; 4];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Width divided by height, in coordinate units.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// Lower-left and upper-right corners.
    pub fn corners(&self) -> [(f64, f64); 2] {
        [(self.min_x, self.min_y), (self.max_x, self.max_y)]
    }

    /// True when all coordinates are finite and the box has a positive area.
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Check if another bbox lies entirely inside this one (edges may touch).
    pub fn contains_bbox(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wms_bbox() {
        let bbox = BoundingBox::from_wms_string("-125.0,24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_x, -125.0);
        assert_eq!(bbox.min_y, 24.0);
        assert_eq!(bbox.max_x, -66.0);
        assert_eq!(bbox.max_y, 50.0);
    }

    #[test]
    fn test_parse_wms_bbox_with_spaces() {
        let bbox = BoundingBox::from_wms_string("0, 0, 10, 10").unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_from_center() {
        let bbox = BoundingBox::from_center(5.0, 5.0, 2.0, 1.0);
        assert_eq!(bbox, BoundingBox::new(3.0, 4.0, 7.0, 6.0));
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 2.0);
        assert_eq!(bbox.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_contains_bbox() {
        let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert!(region.contains_bbox(&BoundingBox::new(1.0, 1.0, 9.0, 9.0)));
        assert!(region.contains_bbox(&region));
        assert!(!region.contains_bbox(&BoundingBox::new(-0.1, 1.0, 9.0, 9.0)));
        assert!(!region.contains_bbox(&BoundingBox::new(1.0, 1.0, 9.0, 10.5)));
    }

    #[test]
    fn test_is_valid() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(1.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(0.0, 2.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, f64::NAN, 1.0).is_valid());
    }
}
