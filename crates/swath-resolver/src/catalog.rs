//! Catalog of declared and synthesized dimension maps.

use std::collections::HashMap;

use swath_core::{DimensionMap, FieldDecl, SwathError, SwathResult};

/// All dimension maps declared for a dataset, plus synthesis of identity
/// maps for the axes no declared map covers.
#[derive(Debug, Clone)]
pub struct DimensionMapCatalog {
    maps: Vec<DimensionMap>,
}

impl DimensionMapCatalog {
    /// Build a catalog, validating every declared map against the
    /// dataset's dimension namespace.
    pub fn new(
        maps: Vec<DimensionMap>,
        dimension_sizes: &HashMap<String, usize>,
    ) -> SwathResult<Self> {
        for map in &maps {
            if map.increment == 0 {
                return Err(SwathError::config(format!(
                    "dimension map {}/{} has increment 0",
                    map.geo_dim, map.data_dim
                )));
            }
            if !dimension_sizes.contains_key(&map.geo_dim) {
                return Err(SwathError::config(format!(
                    "dimension map references unknown dimension '{}'",
                    map.geo_dim
                )));
            }
            if !dimension_sizes.contains_key(&map.data_dim) {
                return Err(SwathError::config(format!(
                    "dimension map references unknown dimension '{}'",
                    map.data_dim
                )));
            }
        }
        Ok(Self { maps })
    }

    /// All declared maps.
    pub fn maps(&self) -> &[DimensionMap] {
        &self.maps
    }

    /// Declared maps whose data dimension matches one of the field's axes.
    pub fn maps_for_field(&self, field: &FieldDecl) -> Vec<&DimensionMap> {
        self.maps
            .iter()
            .filter(|m| field.axis_index(&m.data_dim).is_some())
            .collect()
    }

    /// Identity maps for every axis of the field no declared map covers,
    /// so that every axis ends up with at least one applicable map.
    pub fn default_maps_for_field(&self, field: &FieldDecl) -> Vec<DimensionMap> {
        field
            .dims
            .iter()
            .filter(|dim| !self.maps.iter().any(|m| m.data_dim == dim.name))
            .map(|dim| DimensionMap::identity(&dim.name))
            .collect()
    }

    /// Declared maps applicable to the field followed by synthesized
    /// identity maps for the uncovered axes.
    pub fn effective_maps_for_field(&self, field: &FieldDecl) -> Vec<DimensionMap> {
        let mut effective: Vec<DimensionMap> =
            self.maps_for_field(field).into_iter().cloned().collect();
        effective.extend(self.default_maps_for_field(field));
        effective
    }
}
