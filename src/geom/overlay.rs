use geo::{Area, BooleanOps, BoundingRect, MultiPolygon};

use crate::geom::Geometries;

impl Geometries {
    /// Intersect `other` with every shape whose bounding box it touches.
    ///
    /// Returns `(shape index, piece area)` for each disjoint piece of each non-empty
    /// intersection, so a shape crossed twice by `other` yields two entries. Areas are
    /// recomputed from the clipped pieces; zero-area pieces (shared edges, points) are dropped.
    pub(crate) fn overlap_pieces(&self, other: &MultiPolygon<f64>) -> Vec<(usize, f64)> {
        let Some(rect) = other.bounding_rect() else { return Vec::new() };

        let mut candidates = self.candidates(&rect).collect::<Vec<_>>();
        candidates.sort_unstable();

        candidates.into_iter()
            .flat_map(|idx| {
                self.shape(idx).intersection(other).0.into_iter()
                    .map(move |piece| (idx, piece.unsigned_area()))
            })
            .filter(|&(_, area)| area > 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0),
        ]])
    }

    #[test]
    fn clips_against_each_candidate() {
        let geoms = Geometries::new(vec![rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 0.0, 20.0, 10.0)]);
        let pieces = geoms.overlap_pieces(&rect(5.0, 0.0, 12.0, 10.0));

        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].0, 0);
        assert!((pieces[0].1 - 50.0).abs() < 1e-6);
        assert_eq!(pieces[1].0, 1);
        assert!((pieces[1].1 - 20.0).abs() < 1e-6);
    }

    #[test]
    fn boundary_touch_yields_nothing() {
        let geoms = Geometries::new(vec![rect(0.0, 0.0, 10.0, 10.0)]);
        assert!(geoms.overlap_pieces(&rect(10.0, 0.0, 20.0, 10.0)).is_empty());
        assert!(geoms.overlap_pieces(&MultiPolygon(vec![])).is_empty());
    }

    #[test]
    fn disjoint_intersection_is_split_into_pieces() {
        // U-shaped shape crossed by a bar: the bar meets both arms separately.
        let u_shape = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0), (x: 30.0, y: 0.0), (x: 30.0, y: 30.0), (x: 20.0, y: 30.0),
            (x: 20.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 30.0), (x: 0.0, y: 30.0), (x: 0.0, y: 0.0),
        ]]);
        let geoms = Geometries::new(vec![u_shape]);
        let pieces = geoms.overlap_pieces(&rect(-5.0, 20.0, 35.0, 25.0));

        assert_eq!(pieces.len(), 2);
        for (idx, area) in pieces {
            assert_eq!(idx, 0);
            assert!((area - 50.0).abs() < 1e-6);
        }
    }
}
