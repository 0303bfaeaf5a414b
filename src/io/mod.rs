//! IO module for format-specific reading and writing operations.
//!
//! Shapefile input lives in `common`, next to the polygon conversion it feeds; this module
//! handles the tabular crosswalk output.

pub mod csv;
