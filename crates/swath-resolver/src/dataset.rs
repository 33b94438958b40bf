//! Dataset facade: one owning arena of fields plus the resolution engine.
//!
//! All fields live in a single arena addressed by opaque ids; the exposed,
//! replaced, and adjusted-only geolocation categorizations are disjoint id
//! sets checked against the partition invariant instead of lists mutated
//! in place.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use swath_core::{DimensionMap, FieldDecl, FieldRole, SwathError, SwathResult};

use crate::cache::{AdjustedFieldCache, AdjustedId, CacheStats};
use crate::catalog::DimensionMapCatalog;
use crate::config::ResolverConfig;
use crate::expand;
use crate::hyperslab;
use crate::provider::ContainerProvider;
use crate::resolver::{self, ResolvedAssociation, ResolvedGeo};

/// Opaque handle of a field in the dataset arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub(crate) usize);

/// A stored field plus its lazily read buffer.
///
/// `buffer` follows the get/drop discipline: `None` until the provider's
/// whole-field read materializes it, back to `None` when released.
struct RawField {
    decl: FieldDecl,
    role: FieldRole,
    buffer: Option<Vec<f64>>,
}

/// An opened swath dataset.
pub struct Dataset {
    fields: Vec<RawField>,
    data_ids: Vec<FieldId>,
    /// Raw geolocation fields served unmodified.
    geo_ids: Vec<FieldId>,
    /// Raw geolocation fields superseded by an adjusted field of the same
    /// logical name.
    replaced_geo_ids: Vec<FieldId>,
    by_name: HashMap<String, FieldId>,
    /// Logical base name -> the adjusted field serving under it.
    overrides: HashMap<String, AdjustedId>,
    catalog: DimensionMapCatalog,
    cache: AdjustedFieldCache,
    provider: Box<dyn ContainerProvider>,
    config: ResolverConfig,
}

impl Dataset {
    /// Open a dataset through its container provider.
    ///
    /// Reads the field inventory and dimension maps once, validates the
    /// dimension namespace, and (unless disabled) runs the geolocation
    /// override pass. Dimension maps and field declarations are immutable
    /// afterwards.
    pub fn open(
        provider: Box<dyn ContainerProvider>,
        config: ResolverConfig,
    ) -> SwathResult<Self> {
        config.validate().map_err(SwathError::config)?;

        let inventory = provider.list_fields()?;
        let mut fields = Vec::new();
        let mut by_name = HashMap::new();
        let mut data_ids = Vec::new();
        let mut geo_ids = Vec::new();
        let mut dimension_sizes: HashMap<String, usize> = HashMap::new();

        let declared = inventory
            .data_fields
            .into_iter()
            .map(|decl| (FieldRole::Data, decl))
            .chain(
                inventory
                    .geo_fields
                    .into_iter()
                    .map(|decl| (FieldRole::Geo, decl)),
            );
        for (role, decl) in declared {
            for dim in &decl.dims {
                if dim.size == 0 {
                    return Err(SwathError::config(format!(
                        "dimension '{}' of field '{}' has size 0",
                        dim.name, decl.name
                    )));
                }
                match dimension_sizes.entry(dim.name.clone()) {
                    Entry::Vacant(e) => {
                        e.insert(dim.size);
                    }
                    Entry::Occupied(e) => {
                        if *e.get() != dim.size {
                            return Err(SwathError::config(format!(
                                "dimension '{}' declared with sizes {} and {}",
                                dim.name,
                                e.get(),
                                dim.size
                            )));
                        }
                    }
                }
            }

            let id = FieldId(fields.len());
            if by_name.insert(decl.name.clone(), id).is_some() {
                return Err(SwathError::config(format!(
                    "duplicate field name '{}'",
                    decl.name
                )));
            }
            match role {
                FieldRole::Data => data_ids.push(id),
                FieldRole::Geo => geo_ids.push(id),
            }
            fields.push(RawField {
                decl,
                role,
                buffer: None,
            });
        }

        let maps = provider.list_dimension_maps()?;
        let catalog = DimensionMapCatalog::new(maps, &dimension_sizes)?;

        let mut dataset = Self {
            fields,
            data_ids,
            geo_ids,
            replaced_geo_ids: Vec::new(),
            by_name,
            overrides: HashMap::new(),
            catalog,
            cache: AdjustedFieldCache::new(config.adjusted_cache_bytes()),
            provider,
            config,
        };

        if dataset.config.override_geo_fields {
            dataset.override_geo_fields()?;
        }
        dataset.check_geo_partition()?;

        tracing::debug!(
            data_fields = dataset.data_ids.len(),
            geo_fields = dataset.geo_ids.len(),
            replaced = dataset.replaced_geo_ids.len(),
            dimension_maps = dataset.catalog.maps().len(),
            "opened swath dataset"
        );
        Ok(dataset)
    }

    /// Data field declarations, in declaration order.
    pub fn data_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.data_ids.iter().map(|id| &self.fields[id.0].decl)
    }

    /// Geolocation field declarations currently served unmodified.
    pub fn geo_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.geo_ids.iter().map(|id| &self.fields[id.0].decl)
    }

    /// Declared dimension maps.
    pub fn dimension_maps(&self) -> &[DimensionMap] {
        self.catalog.maps()
    }

    /// Identities of all adjusted fields created so far.
    pub fn adjusted_identities(&self) -> Vec<String> {
        self.cache
            .ids()
            .map(|id| self.cache.get(id).identity.clone())
            .collect()
    }

    /// The geolocation fields associated with a data field, as
    /// `(source name, served name)` pairs. The served name is the source
    /// name for unadjusted (or overridden) fields and the mangled identity
    /// otherwise.
    pub fn get_associated_geo_fields(
        &mut self,
        data_field: &str,
    ) -> SwathResult<Vec<(String, String)>> {
        let id = self.data_field_id(data_field)?;
        let associations = self.resolve_associations(id)?;
        Ok(associations
            .into_iter()
            .map(|assoc| {
                let served = self.served_name(&assoc);
                (assoc.source, served)
            })
            .collect())
    }

    /// Read a hyperslab of a field, base or adjusted, by served name.
    ///
    /// Values are promoted to `f64` (lossless for every supported element
    /// type). For an unmapped field this is a plain strided read of the
    /// base buffer with no interpolation cost; for an adjusted field the
    /// buffer is materialized on first access and served from the cache
    /// afterwards.
    pub fn read_field(
        &mut self,
        name: &str,
        offset: &[usize],
        count: &[usize],
        stride: &[usize],
    ) -> SwathResult<Vec<f64>> {
        if let Some(aid) = self.overrides.get(name).copied() {
            return self.read_adjusted(aid, offset, count, stride);
        }
        if let Some(aid) = self.cache.lookup(name) {
            return self.read_adjusted(aid, offset, count, stride);
        }
        if let Some(id) = self.by_name.get(name).copied() {
            let shape = self.fields[id.0].decl.shape();
            self.ensure_raw_loaded(id)?;
            let buf = self.fields[id.0]
                .buffer
                .as_deref()
                .ok_or_else(|| SwathError::config("raw buffer missing after load"))?;
            return hyperslab::extract(buf, &shape, offset, count, stride);
        }
        Err(SwathError::FieldNotFound(name.to_string()))
    }

    /// Read a whole field (offset 0, full count, stride 1 on every axis).
    pub fn read_field_full(&mut self, name: &str) -> SwathResult<Vec<f64>> {
        let shape = self.field_shape(name)?;
        let offset = vec![0; shape.len()];
        let stride = vec![1; shape.len()];
        self.read_field(name, &offset, &shape, &stride)
    }

    /// Shape of a field by served name.
    pub fn field_shape(&self, name: &str) -> SwathResult<Vec<usize>> {
        if let Some(aid) = self.overrides.get(name) {
            return Ok(self.cache.get(*aid).shape());
        }
        if let Some(aid) = self.cache.lookup(name) {
            return Ok(self.cache.get(aid).shape());
        }
        if let Some(id) = self.by_name.get(name) {
            return Ok(self.fields[id.0].decl.shape());
        }
        Err(SwathError::FieldNotFound(name.to_string()))
    }

    /// Release a raw field's buffer; it is re-read on the next access.
    pub fn drop_raw_buffer(&mut self, name: &str) -> SwathResult<()> {
        let id = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| SwathError::FieldNotFound(name.to_string()))?;
        self.fields[id.0].buffer = None;
        Ok(())
    }

    /// Release least-recently-used adjusted buffers down to the target
    /// byte count. Released buffers recompute on their next access.
    pub fn release_adjusted_buffers(&mut self, target_bytes: usize) -> usize {
        self.cache.release_to(target_bytes)
    }

    /// Adjusted-field cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The configuration this dataset was opened with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn data_field_id(&self, name: &str) -> SwathResult<FieldId> {
        let id = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| SwathError::FieldNotFound(name.to_string()))?;
        if self.fields[id.0].role != FieldRole::Data {
            return Err(SwathError::config(format!(
                "'{}' is a geolocation field, not a data field",
                name
            )));
        }
        Ok(id)
    }

    fn resolve_associations(
        &mut self,
        data_id: FieldId,
    ) -> SwathResult<Vec<ResolvedAssociation>> {
        let fields = &self.fields;
        let cache = &mut self.cache;
        let data_decl = &fields[data_id.0].decl;
        let geo_fields: Vec<(FieldId, &FieldDecl)> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.role == FieldRole::Geo)
            .map(|(i, f)| (FieldId(i), &f.decl))
            .collect();
        resolver::resolve(data_decl, &geo_fields, &self.catalog, cache)
    }

    fn served_name(&self, assoc: &ResolvedAssociation) -> String {
        match assoc.resolved {
            ResolvedGeo::Base(gid) => self.fields[gid.0].decl.name.clone(),
            ResolvedGeo::Adjusted(aid) => match self.overrides.get(&assoc.source) {
                Some(over) if *over == aid => assoc.source.clone(),
                _ => self.cache.get(aid).identity.clone(),
            },
        }
    }

    /// Supersede base geolocation fields that every consumer adjusts the
    /// same way: the adjusted field serves under the base logical name and
    /// the raw field moves to the replaced set. Two different adjustments
    /// of one base field are a configuration error.
    fn override_geo_fields(&mut self) -> SwathResult<()> {
        let mut used: HashMap<String, String> = HashMap::new();
        for data_id in self.data_ids.clone() {
            for assoc in self.resolve_associations(data_id)? {
                let resolved_name = match assoc.resolved {
                    ResolvedGeo::Base(_) => assoc.source.clone(),
                    ResolvedGeo::Adjusted(aid) => self.cache.get(aid).identity.clone(),
                };
                match used.entry(assoc.source) {
                    Entry::Vacant(e) => {
                        e.insert(resolved_name);
                    }
                    Entry::Occupied(e) => {
                        if *e.get() != resolved_name {
                            return Err(SwathError::config(format!(
                                "geolocation field '{}' is adjusted twice: '{}' and '{}'",
                                e.key(),
                                e.get(),
                                resolved_name
                            )));
                        }
                    }
                }
            }
        }

        for (source, resolved) in used {
            if source == resolved {
                continue;
            }
            let aid = self.cache.lookup(&resolved).ok_or_else(|| {
                SwathError::config(format!(
                    "cannot find replacing geolocation field '{}'",
                    resolved
                ))
            })?;
            let gid = self.by_name.get(&source).copied().ok_or_else(|| {
                SwathError::config(format!(
                    "cannot find replaced geolocation field '{}'",
                    source
                ))
            })?;
            let position = self
                .geo_ids
                .iter()
                .position(|id| *id == gid)
                .ok_or_else(|| {
                    SwathError::config(format!(
                        "geolocation field '{}' is not exposed and cannot be replaced",
                        source
                    ))
                })?;
            self.geo_ids.remove(position);
            self.replaced_geo_ids.push(gid);
            self.overrides.insert(source, aid);
        }
        Ok(())
    }

    /// Check the geolocation partition invariant: exposed, replaced, and
    /// adjusted-only sets are pairwise disjoint and together cover every
    /// geolocation field known to the dataset.
    fn check_geo_partition(&self) -> SwathResult<()> {
        let exposed: HashSet<FieldId> = self.geo_ids.iter().copied().collect();
        let replaced: HashSet<FieldId> = self.replaced_geo_ids.iter().copied().collect();
        if !exposed.is_disjoint(&replaced) {
            return Err(SwathError::config(
                "exposed and replaced geolocation sets overlap",
            ));
        }

        let raw_geo = self
            .fields
            .iter()
            .filter(|f| f.role == FieldRole::Geo)
            .count();
        if exposed.len() + replaced.len() != raw_geo {
            return Err(SwathError::config(
                "geolocation partition does not cover every stored field",
            ));
        }

        for (name, aid) in &self.overrides {
            match self.by_name.get(name) {
                Some(gid) if replaced.contains(gid) => {}
                _ => {
                    return Err(SwathError::config(format!(
                        "override of '{}' does not correspond to a replaced field",
                        name
                    )))
                }
            }
            if self.cache.lookup(&self.cache.get(*aid).identity) != Some(*aid) {
                return Err(SwathError::config(format!(
                    "override of '{}' points at an unknown adjusted field",
                    name
                )));
            }
        }
        Ok(())
    }

    fn read_adjusted(
        &mut self,
        aid: AdjustedId,
        offset: &[usize],
        count: &[usize],
        stride: &[usize],
    ) -> SwathResult<Vec<f64>> {
        self.materialize(aid)?;
        let shape = self.cache.get(aid).shape();
        let buf = self
            .cache
            .touch_buffer(aid)
            .ok_or_else(|| SwathError::config("adjusted buffer missing after materialization"))?;
        hyperslab::extract(buf, &shape, offset, count, stride)
    }

    /// Run the expansion kernel for a descriptor whose buffer is not
    /// resident. The base raw buffer is only borrowed: if this call had to
    /// read it, it is released again afterwards.
    fn materialize(&mut self, aid: AdjustedId) -> SwathResult<()> {
        if self.cache.get(aid).is_ready() {
            return Ok(());
        }

        let (base, axis_maps, identity, expected_shape) = {
            let entry = self.cache.get(aid);
            (
                entry.base,
                entry.axis_maps(),
                entry.identity.clone(),
                entry.shape(),
            )
        };

        let was_resident = self.fields[base.0].buffer.is_some();
        self.ensure_raw_loaded(base)?;
        self.cache.begin_compute(aid);

        let result = {
            let base_field = &self.fields[base.0];
            let base_shape = base_field.decl.shape();
            match base_field.buffer.as_deref() {
                Some(raw) => expand::expand(raw, &base_shape, &axis_maps),
                None => Err(SwathError::config("base buffer missing during expansion")),
            }
        };

        let outcome = match result {
            Ok((buffer, shape)) if shape == expected_shape => {
                tracing::debug!(
                    identity = %identity,
                    elements = buffer.len(),
                    "materialized adjusted geolocation field"
                );
                self.cache.install_buffer(aid, buffer);
                Ok(())
            }
            Ok((_, shape)) => {
                self.cache.abort_compute(aid);
                Err(SwathError::config(format!(
                    "expansion of '{}' produced shape {:?}, expected {:?}",
                    identity, shape, expected_shape
                )))
            }
            Err(e) => {
                self.cache.abort_compute(aid);
                Err(e)
            }
        };

        if !was_resident {
            self.fields[base.0].buffer = None;
        }
        outcome
    }

    fn ensure_raw_loaded(&mut self, id: FieldId) -> SwathResult<()> {
        if self.fields[id.0].buffer.is_some() {
            return Ok(());
        }
        let (name, element_type, expected_len) = {
            let decl = &self.fields[id.0].decl;
            (decl.name.clone(), decl.element_type, decl.len())
        };

        let raw = self.provider.read_field_buffer(&name)?;
        if raw.element_type != element_type {
            return Err(SwathError::provider(format!(
                "field '{}' declared as {} but provider delivered {}",
                name, element_type, raw.element_type
            )));
        }
        let values = raw.element_type.decode_to_f64(&raw.bytes)?;
        if values.len() != expected_len {
            return Err(SwathError::provider(format!(
                "field '{}' delivered {} elements but its shape requires {}",
                name,
                values.len(),
                expected_len
            )));
        }
        self.fields[id.0].buffer = Some(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{ramp, MemoryContainer};

    fn adjusted_dataset() -> Dataset {
        let container = MemoryContainer::new()
            .dimension_map("Coarse_Track", "Track", 0, 2)
            .geo_field_f32("Latitude", &[("Coarse_Track", 4)], &ramp(4))
            .geo_field_f32("Elevation", &[("Track", 7)], &ramp(7))
            .data_field_f32("Science", &[("Track", 7)], &ramp(7));
        Dataset::open(Box::new(container), ResolverConfig::default()).unwrap()
    }

    #[test]
    fn test_override_moves_base_to_replaced_set() {
        let dataset = adjusted_dataset();
        let lat = dataset.by_name["Latitude"];
        let elev = dataset.by_name["Elevation"];

        assert!(dataset.replaced_geo_ids.contains(&lat));
        assert!(!dataset.geo_ids.contains(&lat));
        assert!(dataset.geo_ids.contains(&elev));
        assert!(dataset.overrides.contains_key("Latitude"));
    }

    #[test]
    fn test_geo_partition_invariant_holds() {
        let dataset = adjusted_dataset();
        assert!(dataset.check_geo_partition().is_ok());

        // Exposed + replaced must cover every stored geolocation field
        let raw_geo = dataset
            .fields
            .iter()
            .filter(|f| f.role == FieldRole::Geo)
            .count();
        assert_eq!(
            dataset.geo_ids.len() + dataset.replaced_geo_ids.len(),
            raw_geo
        );
    }

    #[test]
    fn test_base_buffer_released_after_expansion() {
        let mut dataset = adjusted_dataset();
        let lat = dataset.by_name["Latitude"];

        dataset.read_field_full("Latitude").unwrap();
        // The engine fetched the base buffer for expansion and let go of it
        assert!(dataset.fields[lat.0].buffer.is_none());
    }
}
