//! Shared data model for swath geolocation resolution.
//!
//! Swath-style datasets store science fields and the coordinate fields that
//! locate them at possibly different sampling rates, related by per-axis
//! dimension maps. This crate holds the vocabulary shared by the resolution
//! engine and its container-layer collaborators: dimensions, dimension maps,
//! field declarations, element types, and the common error type.

pub mod dimension;
pub mod dimmap;
pub mod element;
pub mod error;
pub mod field;

// Re-export commonly used types at crate root
pub use dimension::Dimension;
pub use dimmap::DimensionMap;
pub use element::ElementType;
pub use error::{SwathError, SwathResult};
pub use field::{FieldDecl, FieldRole};
