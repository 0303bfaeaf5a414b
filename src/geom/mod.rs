mod bbox;
mod check;
mod dissolve;
mod geom;
mod overlay;
mod proj;

use bbox::BoundingBox;
pub(crate) use check::polygonal_area;
pub(crate) use dissolve::dissolve;
pub(crate) use geom::Geometries;
pub use proj::Crs;
pub(crate) use proj::Reprojector;
