//! Adjusted geolocation field descriptors.
//!
//! An adjusted field is a geolocation field resampled to a consuming data
//! field's resolution. It is derived, never stored in the container; its
//! buffer is computed lazily and may be released and recomputed.

use swath_core::{Dimension, DimensionMap, ElementType};

use crate::dataset::FieldId;
use crate::expand::AxisMap;

/// Binding of one data-field axis to one geolocation-field axis through a
/// dimension map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisBinding {
    /// Axis index on the consuming data field.
    pub data_axis: usize,
    /// Axis index on the base geolocation field.
    pub geo_axis: usize,
    /// The map relating the two axes.
    pub map: DimensionMap,
}

/// Lifecycle of an adjusted field's buffer.
///
/// Readers only ever observe `Uninitialized` or `Ready`; `Computing` is
/// transient while the expansion kernel runs. A `Ready` buffer may return
/// to `Uninitialized` when released under memory pressure and is then
/// recomputed on the next access.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferState {
    Uninitialized,
    Computing,
    Ready(Vec<f64>),
}

/// Descriptor of an adjusted geolocation field.
///
/// Identity is the mangled name: two descriptors with equal identity are
/// the same cache entry, and their buffer is computed at most once per
/// residency.
#[derive(Debug, Clone)]
pub struct AdjustedField {
    /// Mangled identity, also the name the field is served under.
    pub identity: String,
    /// The base geolocation field this descriptor resamples (shared, not
    /// owned).
    pub base: FieldId,
    /// Element type of the base field, kept to detect identity collisions.
    pub base_element_type: ElementType,
    /// Axis bindings in geolocation-axis order, one per base axis.
    pub bindings: Vec<AxisBinding>,
    /// Derived axes cloned from the data field's matching dimensions.
    pub dims: Vec<Dimension>,
    state: BufferState,
}

impl AdjustedField {
    /// Create a descriptor with an uninitialized buffer.
    pub fn new(
        identity: String,
        base: FieldId,
        base_element_type: ElementType,
        bindings: Vec<AxisBinding>,
        dims: Vec<Dimension>,
    ) -> Self {
        Self {
            identity,
            base,
            base_element_type,
            bindings,
            dims,
            state: BufferState::Uninitialized,
        }
    }

    /// Shape of the adjusted field.
    pub fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.dims.iter().map(|d| d.size).product()
    }

    /// Whether the adjusted field holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the buffer is materialized.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, BufferState::Ready(_))
    }

    /// The materialized buffer, if any.
    pub fn buffer(&self) -> Option<&[f64]> {
        match &self.state {
            BufferState::Ready(buf) => Some(buf),
            _ => None,
        }
    }

    /// Size of the materialized buffer in bytes (0 when not resident).
    pub fn resident_bytes(&self) -> usize {
        match &self.state {
            BufferState::Ready(buf) => buf.len() * std::mem::size_of::<f64>(),
            _ => 0,
        }
    }

    /// Per-axis expansion instructions for the kernel. Identity-mapped
    /// axes pass through unchanged and get no instruction.
    pub fn axis_maps(&self) -> Vec<AxisMap> {
        self.bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.map.is_identity())
            .map(|(k, b)| {
                AxisMap::new(b.geo_axis, self.dims[k].size, b.map.offset, b.map.increment)
            })
            .collect()
    }

    pub(crate) fn mark_computing(&mut self) {
        self.state = BufferState::Computing;
    }

    pub(crate) fn install(&mut self, buffer: Vec<f64>) {
        self.state = BufferState::Ready(buffer);
    }

    pub(crate) fn release(&mut self) {
        self.state = BufferState::Uninitialized;
    }
}

/// Mangled identity of an adjusted field: the base field name followed by
/// one `_offset:increment` segment per geolocation axis, in axis order.
pub fn mangle_identity(base_name: &str, bindings: &[AxisBinding]) -> String {
    let mut identity = String::from(base_name);
    for binding in bindings {
        identity.push_str(&format!(
            "_{}:{}",
            binding.map.offset, binding.map.increment
        ));
    }
    identity
}
