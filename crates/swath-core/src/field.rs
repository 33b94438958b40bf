//! Field declarations: named, typed, multi-dimensional variables.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::element::ElementType;

/// Role of a field within the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// A science (data) field.
    Data,
    /// A geolocation (coordinate) field stored in the container.
    Geo,
}

/// Declaration of a stored field: name, element type, and ordered axes.
///
/// The raw buffer itself is not part of the declaration; it is read lazily
/// through the container provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name, unique within a dataset.
    pub name: String,
    /// Element type of the stored buffer.
    pub element_type: ElementType,
    /// Ordered axes, slowest-varying first (row-major).
    pub dims: Vec<Dimension>,
}

impl FieldDecl {
    /// Create a field declaration.
    pub fn new(
        name: impl Into<String>,
        element_type: ElementType,
        dims: Vec<Dimension>,
    ) -> Self {
        Self {
            name: name.into(),
            element_type,
            dims,
        }
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Shape as a size-per-axis vector.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.dims.iter().map(|d| d.size).product()
    }

    /// Whether the field holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the named axis, if the field has one.
    pub fn axis_index(&self, dim_name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d.name == dim_name)
    }
}
