use shapefile as shp;

use crate::error::GeometryIssue;

/// Coerce a generic shape into an owned MultiPolygon, or say why it cannot be used.
pub(crate) fn shape_to_multipolygon(shape: shp::Shape) -> Result<geo::MultiPolygon<f64>, GeometryIssue> {
    match shape {
        shp::Shape::Polygon(polygon) => Ok(shp_to_geo(&polygon)),
        shp::Shape::NullShape => Err(GeometryIssue::Null),
        other => Err(GeometryIssue::Unsupported(format!("{:?}", other.shapetype()))),
    }
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
pub(crate) fn shp_to_geo(p: &shp::Polygon) -> geo::MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0])
        }
    }

    // Group: each outer ring with the inner rings that follow it (Shapefile ring order).
    let mut polys: Vec<geo::Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<geo::LineString<f64>> = None;
    let mut current_holes: Vec<geo::LineString<f64>> = Vec::new();

    for ring in p.rings() {
        let mut coords = ring.points().iter()
            .map(|pt| geo::Coord { x: pt.x, y: pt.y })
            .collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let ls = geo::LineString(coords);

        match ring {
            shp::PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(geo::Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(ls);
            }
            shp::PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(geo::Polygon::new(ext, current_holes));
    }

    geo::MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use geo::Area;
    use shp::{Point, PolygonRing};

    use super::*;

    fn ring(pts: &[(f64, f64)]) -> Vec<Point> {
        pts.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn outer_rings_start_new_polygons_and_holes_attach() {
        let polygon = shp::Polygon::with_rings(vec![
            PolygonRing::Outer(ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)])),
            PolygonRing::Inner(ring(&[(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 4.0), (2.0, 2.0)])),
            PolygonRing::Outer(ring(&[(20.0, 0.0), (20.0, 5.0), (25.0, 5.0), (25.0, 0.0), (20.0, 0.0)])),
        ]);

        let mp = shp_to_geo(&polygon);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[1].interiors().is_empty());
        assert!((mp.unsigned_area() - (100.0 - 4.0 + 25.0)).abs() < 1e-9);
    }

    #[test]
    fn null_and_point_shapes_are_rejected() {
        assert_eq!(shape_to_multipolygon(shp::Shape::NullShape), Err(GeometryIssue::Null));
        assert!(matches!(
            shape_to_multipolygon(shp::Shape::Point(Point::new(1.0, 2.0))),
            Err(GeometryIssue::Unsupported(_)),
        ));
    }
}
