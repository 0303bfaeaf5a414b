mod fs;
mod polygon;
mod shp;

pub(crate) use fs::*;
pub(crate) use polygon::*;
pub(crate) use shp::*;
