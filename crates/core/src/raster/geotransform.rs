//! Affine geotransformation for band rasters

use serde::{Deserialize, Serialize};

use crate::region::BBox;

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and geographic coordinates
/// (lon, lat):
/// ```text
/// lon = origin_x + col * pixel_width + row * row_rotation
/// lat = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images the rotations are 0 and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// North-up transform whose grid of `cols` x `rows` cells exactly covers `bbox`.
    pub fn covering(bbox: &BBox, cols: usize, rows: usize) -> Self {
        Self::new(
            bbox.min_lon,
            bbox.max_lat,
            bbox.width() / cols.max(1) as f64,
            -bbox.height() / rows.max(1) as f64,
        )
    }

    /// Geographic coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.pixel_to_geo_f(col as f64 + 0.5, row as f64 + 0.5)
    }

    fn pixel_to_geo_f(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Convert geographic coordinates to fractional pixel coordinates (col, row).
    ///
    /// Use `.floor()` to get the containing cell. Degenerate transforms yield NaN.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-15 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Bounding box of a grid with `cols` x `rows` cells
    pub fn bounds(&self, cols: usize, rows: usize) -> BBox {
        let corners = [
            self.pixel_to_geo_f(0.0, 0.0),
            self.pixel_to_geo_f(cols as f64, 0.0),
            self.pixel_to_geo_f(0.0, rows as f64),
            self.pixel_to_geo_f(cols as f64, rows as f64),
        ];

        let mut b = BBox::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            b.min_lon = b.min_lon.min(x);
            b.max_lon = b.max_lon.max(x);
            b.min_lat = b.min_lat.min(y);
            b.max_lat = b.max_lat.max(y);
        }
        b
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(85.0, 21.0, 0.001, -0.001);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-9);
        assert_relative_eq!(row, 10.5, epsilon = 1e-9);
    }

    #[test]
    fn test_covering_bounds() {
        let bbox = BBox::bhubaneswar();
        let gt = GeoTransform::covering(&bbox, 100, 50);
        let b = gt.bounds(100, 50);

        assert_relative_eq!(b.min_lon, bbox.min_lon, epsilon = 1e-12);
        assert_relative_eq!(b.min_lat, bbox.min_lat, epsilon = 1e-12);
        assert_relative_eq!(b.max_lon, bbox.max_lon, epsilon = 1e-12);
        assert_relative_eq!(b.max_lat, bbox.max_lat, epsilon = 1e-12);
    }
}
