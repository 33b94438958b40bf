//! Association of data fields with their geolocation fields.
//!
//! A geolocation field is usable as a coordinate of a data field only if
//! every one of its axes is reachable from the data field through an
//! applicable dimension map (explicit or synthesized identity). The
//! resolver builds one assignment slot per geolocation axis instead of
//! walking nested conditional loops, and hands non-trivial combinations to
//! the adjusted-field cache keyed by mangled identity.

use swath_core::{Dimension, FieldDecl, SwathError, SwathResult};

use crate::adjusted::{mangle_identity, AdjustedField, AxisBinding};
use crate::cache::{AdjustedFieldCache, AdjustedId};
use crate::catalog::DimensionMapCatalog;
use crate::dataset::FieldId;
use crate::expand::MAX_MAPPED_RANK;

/// What a geolocation association resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedGeo {
    /// The base field serves unmodified: every applicable map was the
    /// identity.
    Base(FieldId),
    /// A derived field resampled to the data field's resolution.
    Adjusted(AdjustedId),
}

/// One geolocation field associated with a data field.
#[derive(Debug, Clone)]
pub struct ResolvedAssociation {
    /// Name of the base geolocation field.
    pub source: String,
    /// The field that actually serves the coordinates.
    pub resolved: ResolvedGeo,
}

/// Find every geolocation field whose axes are fully covered by maps
/// applicable to `data_field`, creating or reusing adjusted descriptors
/// for the non-trivial combinations.
pub fn resolve(
    data_field: &FieldDecl,
    geo_fields: &[(FieldId, &FieldDecl)],
    catalog: &DimensionMapCatalog,
    cache: &mut AdjustedFieldCache,
) -> SwathResult<Vec<ResolvedAssociation>> {
    let effective = catalog.effective_maps_for_field(data_field);

    let mut associations = Vec::new();
    for &(gid, geo) in geo_fields {
        // One slot per geolocation axis; a second supplier for the same
        // slot is a contradictory configuration, not a choice to make.
        let mut slots: Vec<Option<AxisBinding>> = vec![None; geo.rank()];
        for (data_axis, data_dim) in data_field.dims.iter().enumerate() {
            for map in effective.iter().filter(|m| m.data_dim == data_dim.name) {
                for (geo_axis, geo_dim) in geo.dims.iter().enumerate() {
                    if geo_dim.name != map.geo_dim {
                        continue;
                    }
                    if slots[geo_axis].is_some() {
                        return Err(SwathError::config(format!(
                            "axis '{}' of geolocation field '{}' is supplied by more \
                             than one dimension map for data field '{}'",
                            geo_dim.name, geo.name, data_field.name
                        )));
                    }
                    slots[geo_axis] = Some(AxisBinding {
                        data_axis,
                        geo_axis,
                        map: map.clone(),
                    });
                }
            }
        }

        // Incomplete coverage: this geolocation field does not locate the
        // data field.
        if slots.iter().any(Option::is_none) {
            continue;
        }
        let bindings: Vec<AxisBinding> = slots.into_iter().flatten().collect();

        if bindings.iter().all(|b| b.map.is_identity()) {
            associations.push(ResolvedAssociation {
                source: geo.name.clone(),
                resolved: ResolvedGeo::Base(gid),
            });
            continue;
        }

        if geo.rank() > MAX_MAPPED_RANK {
            return Err(SwathError::UnsupportedRank {
                rank: geo.rank(),
                max: MAX_MAPPED_RANK,
            });
        }

        let identity = mangle_identity(&geo.name, &bindings);
        if let Some(existing) = cache.lookup(&identity) {
            let entry = cache.get(existing);
            if entry.base != gid || entry.base_element_type != geo.element_type {
                return Err(SwathError::config(format!(
                    "two geolocation fields satisfy identity '{}' with different \
                     origins or element types",
                    identity
                )));
            }
        }

        let derived_dims: Vec<Dimension> = bindings
            .iter()
            .map(|b| data_field.dims[b.data_axis].clone())
            .collect();
        let id = cache.get_or_create(&identity, || {
            Ok(AdjustedField::new(
                identity.clone(),
                gid,
                geo.element_type,
                bindings.clone(),
                derived_dims,
            ))
        })?;
        associations.push(ResolvedAssociation {
            source: geo.name.clone(),
            resolved: ResolvedGeo::Adjusted(id),
        });
    }

    Ok(associations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use swath_core::{DimensionMap, ElementType};

    fn namespace() -> HashMap<String, usize> {
        [
            ("Track".to_string(), 8),
            ("Scan".to_string(), 10),
            ("Coarse_Track".to_string(), 4),
            ("Coarse_Scan".to_string(), 5),
            ("Band".to_string(), 3),
        ]
        .into_iter()
        .collect()
    }

    fn radiance() -> FieldDecl {
        FieldDecl::new(
            "Radiance",
            ElementType::Float32,
            vec![Dimension::new("Track", 8), Dimension::new("Scan", 10)],
        )
    }

    fn coarse_latitude() -> FieldDecl {
        FieldDecl::new(
            "Latitude",
            ElementType::Float32,
            vec![
                Dimension::new("Coarse_Track", 4),
                Dimension::new("Coarse_Scan", 5),
            ],
        )
    }

    fn full_rate_longitude() -> FieldDecl {
        FieldDecl::new(
            "Longitude",
            ElementType::Float64,
            vec![Dimension::new("Track", 8), Dimension::new("Scan", 10)],
        )
    }

    fn catalog(maps: Vec<DimensionMap>) -> DimensionMapCatalog {
        DimensionMapCatalog::new(maps, &namespace()).unwrap()
    }

    #[test]
    fn test_adjusted_association_created() {
        let catalog = catalog(vec![
            DimensionMap::new("Coarse_Track", "Track", 0, 2),
            DimensionMap::new("Coarse_Scan", "Scan", 0, 2),
        ]);
        let lat = coarse_latitude();
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let associations = resolve(
            &radiance(),
            &[(FieldId(1), &lat)],
            &catalog,
            &mut cache,
        )
        .unwrap();

        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].source, "Latitude");
        let ResolvedGeo::Adjusted(id) = associations[0].resolved else {
            panic!("expected an adjusted association");
        };
        let entry = cache.get(id);
        assert_eq!(entry.identity, "Latitude_0:2_0:2");
        // Derived axes come from the data field
        assert_eq!(entry.shape(), vec![8, 10]);
    }

    #[test]
    fn test_identity_maps_return_base_field() {
        let catalog = catalog(vec![]);
        let lon = full_rate_longitude();
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let associations = resolve(
            &radiance(),
            &[(FieldId(2), &lon)],
            &catalog,
            &mut cache,
        )
        .unwrap();

        assert_eq!(associations.len(), 1);
        assert_eq!(associations[0].resolved, ResolvedGeo::Base(FieldId(2)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_incomplete_group_discarded() {
        // Only the track axis is mapped; the latitude scan axis stays
        // unreachable, so latitude is not a coordinate of this field.
        let catalog = catalog(vec![DimensionMap::new("Coarse_Track", "Track", 0, 2)]);
        let lat = coarse_latitude();
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let associations = resolve(
            &radiance(),
            &[(FieldId(1), &lat)],
            &catalog,
            &mut cache,
        )
        .unwrap();
        assert!(associations.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_duplicate_geo_axis_rejected() {
        let catalog = catalog(vec![
            DimensionMap::new("Coarse_Track", "Track", 0, 2),
            DimensionMap::new("Coarse_Track", "Scan", 0, 2),
            DimensionMap::new("Coarse_Scan", "Scan", 0, 2),
        ]);
        let lat = coarse_latitude();
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let result = resolve(&radiance(), &[(FieldId(1), &lat)], &catalog, &mut cache);
        assert!(matches!(result, Err(SwathError::Config(_))));
    }

    #[test]
    fn test_rank_above_limit_rejected() {
        let mut namespace = namespace();
        namespace.insert("Coarse_Band".to_string(), 2);
        namespace.insert("Extra".to_string(), 4);
        namespace.insert("Coarse_Extra".to_string(), 2);
        let catalog = DimensionMapCatalog::new(
            vec![
                DimensionMap::new("Coarse_Track", "Track", 0, 2),
                DimensionMap::new("Coarse_Scan", "Scan", 0, 2),
                DimensionMap::new("Coarse_Band", "Band", 0, 2),
                DimensionMap::new("Coarse_Extra", "Extra", 0, 2),
            ],
            &namespace,
        )
        .unwrap();

        let data = FieldDecl::new(
            "Hyper",
            ElementType::Float32,
            vec![
                Dimension::new("Track", 8),
                Dimension::new("Scan", 10),
                Dimension::new("Band", 3),
                Dimension::new("Extra", 4),
            ],
        );
        let geo = FieldDecl::new(
            "Grid4",
            ElementType::Float32,
            vec![
                Dimension::new("Coarse_Track", 4),
                Dimension::new("Coarse_Scan", 5),
                Dimension::new("Coarse_Band", 2),
                Dimension::new("Coarse_Extra", 2),
            ],
        );
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let result = resolve(&data, &[(FieldId(1), &geo)], &catalog, &mut cache);
        assert!(matches!(
            result,
            Err(SwathError::UnsupportedRank { rank: 4, max: 3 })
        ));
    }

    #[test]
    fn test_identity_collision_with_different_element_type_rejected() {
        let catalog = catalog(vec![
            DimensionMap::new("Coarse_Track", "Track", 0, 2),
            DimensionMap::new("Coarse_Scan", "Scan", 0, 2),
        ]);
        let lat32 = coarse_latitude();
        let mut lat64 = coarse_latitude();
        lat64.element_type = ElementType::Float64;
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        // Two same-named fields produce the same mangled identity but
        // different origins; resolution refuses to guess.
        let result = resolve(
            &radiance(),
            &[(FieldId(1), &lat32), (FieldId(2), &lat64)],
            &catalog,
            &mut cache,
        );
        assert!(matches!(result, Err(SwathError::Config(_))));
    }

    #[test]
    fn test_shared_identity_reuses_descriptor() {
        let catalog = catalog(vec![
            DimensionMap::new("Coarse_Track", "Track", 0, 2),
            DimensionMap::new("Coarse_Scan", "Scan", 0, 2),
        ]);
        let lat = coarse_latitude();
        let mut cache = AdjustedFieldCache::new(1024 * 1024);

        let first = resolve(&radiance(), &[(FieldId(1), &lat)], &catalog, &mut cache).unwrap();
        let second = resolve(&radiance(), &[(FieldId(1), &lat)], &catalog, &mut cache).unwrap();

        let ResolvedGeo::Adjusted(a) = first[0].resolved else {
            panic!()
        };
        let ResolvedGeo::Adjusted(b) = second[0].resolved else {
            panic!()
        };
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
    }
}
