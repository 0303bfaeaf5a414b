use geo::{Area, CoordsIter, MultiPolygon};

use crate::error::GeometryIssue;

/// Check that a shape can take part in the overlay, returning its planar area.
pub(crate) fn polygonal_area(shape: &MultiPolygon<f64>) -> Result<f64, GeometryIssue> {
    // A closed ring needs at least four coordinates.
    if shape.0.iter().all(|polygon| polygon.exterior().0.len() < 4) {
        return Err(GeometryIssue::Empty);
    }
    if !shape.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
        return Err(GeometryIssue::NonFinite);
    }

    let area = shape.unsigned_area();
    if area > 0.0 { Ok(area) } else { Err(GeometryIssue::ZeroArea) }
}
