//! Test data generation utilities.
//!
//! Provides an in-memory container provider with known values for unit and
//! integration tests, plus small value generators. Containers are built
//! field by field and handed to [`crate::Dataset::open`].

use std::collections::HashMap;

use swath_core::{Dimension, DimensionMap, ElementType, FieldDecl, SwathError, SwathResult};

use crate::provider::{ContainerProvider, FieldInventory, RawFieldBuffer};

/// Create ramp data: value at index `i` is `i` (as f64).
pub fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

/// Create plane data where value at (row, col) = row * 1000 + col.
/// This pattern makes it easy to verify samples after resolution.
pub fn plane(rows: usize, cols: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            data.push((r * 1000 + c) as f64);
        }
    }
    data
}

/// Encode f64 values as a native-endian f32 buffer.
pub fn encode_f32(values: &[f64]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| (*v as f32).to_ne_bytes())
        .collect()
}

/// Encode f64 values as a native-endian f64 buffer.
pub fn encode_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Encode f64 values as a native-endian i16 buffer (values must fit).
pub fn encode_i16(values: &[f64]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|v| (*v as i16).to_ne_bytes())
        .collect()
}

/// In-memory swath container for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryContainer {
    maps: Vec<DimensionMap>,
    data_fields: Vec<FieldDecl>,
    geo_fields: Vec<FieldDecl>,
    buffers: HashMap<String, RawFieldBuffer>,
}

impl MemoryContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dimension map.
    pub fn dimension_map(
        mut self,
        geo_dim: &str,
        data_dim: &str,
        offset: i64,
        increment: i64,
    ) -> Self {
        self.maps
            .push(DimensionMap::new(geo_dim, data_dim, offset, increment));
        self
    }

    /// Declare a geolocation field with f32 storage.
    pub fn geo_field_f32(mut self, name: &str, dims: &[(&str, usize)], values: &[f64]) -> Self {
        let decl = FieldDecl::new(name, ElementType::Float32, to_dims(dims));
        self.buffers.insert(
            name.to_string(),
            RawFieldBuffer {
                bytes: encode_f32(values),
                element_type: ElementType::Float32,
            },
        );
        self.geo_fields.push(decl);
        self
    }

    /// Declare a geolocation field with f64 storage.
    pub fn geo_field_f64(mut self, name: &str, dims: &[(&str, usize)], values: &[f64]) -> Self {
        let decl = FieldDecl::new(name, ElementType::Float64, to_dims(dims));
        self.buffers.insert(
            name.to_string(),
            RawFieldBuffer {
                bytes: encode_f64(values),
                element_type: ElementType::Float64,
            },
        );
        self.geo_fields.push(decl);
        self
    }

    /// Declare a data field with i16 storage.
    pub fn data_field_i16(mut self, name: &str, dims: &[(&str, usize)], values: &[f64]) -> Self {
        let decl = FieldDecl::new(name, ElementType::Int16, to_dims(dims));
        self.buffers.insert(
            name.to_string(),
            RawFieldBuffer {
                bytes: encode_i16(values),
                element_type: ElementType::Int16,
            },
        );
        self.data_fields.push(decl);
        self
    }

    /// Declare a data field with f32 storage.
    pub fn data_field_f32(mut self, name: &str, dims: &[(&str, usize)], values: &[f64]) -> Self {
        let decl = FieldDecl::new(name, ElementType::Float32, to_dims(dims));
        self.buffers.insert(
            name.to_string(),
            RawFieldBuffer {
                bytes: encode_f32(values),
                element_type: ElementType::Float32,
            },
        );
        self.data_fields.push(decl);
        self
    }
}

fn to_dims(dims: &[(&str, usize)]) -> Vec<Dimension> {
    dims.iter()
        .map(|(name, size)| Dimension::new(*name, *size))
        .collect()
}

impl ContainerProvider for MemoryContainer {
    fn list_dimension_maps(&self) -> SwathResult<Vec<DimensionMap>> {
        Ok(self.maps.clone())
    }

    fn list_fields(&self) -> SwathResult<FieldInventory> {
        Ok(FieldInventory {
            data_fields: self.data_fields.clone(),
            geo_fields: self.geo_fields.clone(),
        })
    }

    fn read_field_buffer(&self, field_name: &str) -> SwathResult<RawFieldBuffer> {
        self.buffers
            .get(field_name)
            .cloned()
            .ok_or_else(|| SwathError::provider(format!("no buffer for field '{}'", field_name)))
    }
}
