//! Common types shared across the request generator crates.

pub mod bbox;

pub use bbox::{BboxParseError, BoundingBox};
