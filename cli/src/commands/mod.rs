pub mod build;
pub mod summary;
pub mod validate;
