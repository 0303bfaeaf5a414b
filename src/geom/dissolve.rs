use std::collections::BTreeMap;

use geo::{orient::Direction, unary_union, MultiPolygon, Orient, Polygon};

/// Merge all shapes sharing a key into one (possibly multi-part) MultiPolygon per key.
///
/// Every group is unioned, including groups of one, so overlapping parts inside a single
/// record are counted once just like duplicates spread over several records. Parts are
/// oriented consistently first since the union fills by winding.
pub(crate) fn dissolve<K: Ord>(parts: impl IntoIterator<Item = (K, MultiPolygon<f64>)>) -> BTreeMap<K, MultiPolygon<f64>> {
    let mut groups: BTreeMap<K, Vec<Polygon<f64>>> = BTreeMap::new();
    for (key, shape) in parts {
        groups.entry(key).or_default().extend(shape.orient(Direction::Default));
    }

    groups.into_iter()
        .map(|(key, polygons)| (key, unary_union(&polygons)))
        .collect()
}
