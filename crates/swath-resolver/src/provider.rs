//! Contract with the container/metadata layer.
//!
//! The engine owns no on-disk format: enumerating fields, dimensions, and
//! dimension maps, and bulk-reading field buffers are supplied by the
//! embedding host through this trait. All reads are eager whole-field
//! reads; there is no partial or streaming access at this seam.

use swath_core::{DimensionMap, ElementType, FieldDecl, SwathResult};

/// The data and geolocation fields a container declares.
#[derive(Debug, Clone, Default)]
pub struct FieldInventory {
    /// Science fields.
    pub data_fields: Vec<FieldDecl>,
    /// Stored geolocation fields.
    pub geo_fields: Vec<FieldDecl>,
}

/// A whole-field raw read: native-endian bytes plus their element type.
#[derive(Debug, Clone)]
pub struct RawFieldBuffer {
    pub bytes: Vec<u8>,
    pub element_type: ElementType,
}

/// Access to a swath container's metadata and field buffers.
pub trait ContainerProvider {
    /// All dimension maps declared by the dataset.
    fn list_dimension_maps(&self) -> SwathResult<Vec<DimensionMap>>;

    /// All field declarations, already classified into data and
    /// geolocation roles by the host's heuristics.
    fn list_fields(&self) -> SwathResult<FieldInventory>;

    /// Read a field's full raw buffer.
    fn read_field_buffer(&self, field_name: &str) -> SwathResult<RawFieldBuffer>;
}
