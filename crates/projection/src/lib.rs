//! Coordinate reference system resolution and transformations.
//!
//! EPSG codes are resolved to proj definitions from a built-in table and
//! the actual coordinate math is delegated to `proj4rs` (pure Rust).

pub mod epsg;
pub mod error;
pub mod transform;

pub use epsg::EpsgCode;
pub use error::{ProjectionError, ProjectionResult};
pub use transform::CoordTransformer;
