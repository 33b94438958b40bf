//! Named dimensions of swath fields.

use serde::{Deserialize, Serialize};

/// A named axis of a field.
///
/// Dimensions are owned by the field that declares them; two fields sharing
/// an axis name refer to the same logical dimension and must agree on size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Dimension name, unique within a dataset.
    pub name: String,
    /// Number of samples along this axis (> 0).
    pub size: usize,
    /// Whether the dimension can grow (appendable record axis).
    pub unlimited: bool,
}

impl Dimension {
    /// Create a fixed-size dimension.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            unlimited: false,
        }
    }

    /// Create an unlimited (appendable) dimension with its current size.
    pub fn unlimited(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            unlimited: true,
        }
    }
}
