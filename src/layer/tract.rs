use geo::MultiPolygon;

use crate::layer::TractId;

/// A census tract. Taken as-is from the input; never dissolved.
#[derive(Debug, Clone)]
pub struct Tract {
    pub id: TractId,
    pub geometry: MultiPolygon<f64>,
}

impl Tract {
    pub fn new(id: impl Into<TractId>, geometry: MultiPolygon<f64>) -> Self {
        Self { id: id.into(), geometry }
    }
}
