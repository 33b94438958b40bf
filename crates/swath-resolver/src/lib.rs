//! Dimension-Map Geolocation Resolution for Swath Datasets
//!
//! Some instruments store latitude/longitude (or other coordinate) fields
//! at a coarser rate than the science fields they locate, recording a
//! per-axis dimension map (offset, increment) that relates data-field
//! indices to geolocation-field indices. This crate reconstructs a
//! geolocation field at the resolution a consuming data field needs, then
//! serves only the requested hyperslab of the result.
//!
//! # Architecture
//!
//! ```text
//! read_field(name, offset, count, stride)
//!      │
//!      ▼
//! Dataset ──► AssociatedFieldResolver
//!      │            │
//!      │            ├─► DimensionMapCatalog (explicit + identity maps)
//!      │            │
//!      │            └─► AdjustedFieldCache (one descriptor per identity)
//!      │
//!      ├─► expand(): separable per-axis interpolation / subsampling
//!      │             (first access only; buffer cached afterwards)
//!      │
//!      └─► extract(): strided hyperslab of the resolved buffer
//! ```
//!
//! # Example
//!
//! ```
//! use swath_resolver::{Dataset, ResolverConfig};
//! use swath_resolver::testdata::MemoryContainer;
//!
//! let container = MemoryContainer::new()
//!     .dimension_map("Coarse_Track", "Track", 0, 2)
//!     .geo_field_f32("Latitude", &[("Coarse_Track", 4)], &[0.0, 10.0, 20.0, 30.0])
//!     .data_field_f32("Radiance", &[("Track", 7)], &[0.0; 7]);
//!
//! let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();
//! let associated = dataset.get_associated_geo_fields("Radiance").unwrap();
//! assert_eq!(associated, vec![("Latitude".to_string(), "Latitude".to_string())]);
//!
//! // The coarse latitude is interpolated to the radiance resolution.
//! let lat = dataset.read_field("Latitude", &[1], &[3], &[2]).unwrap();
//! assert_eq!(lat, vec![5.0, 15.0, 25.0]);
//! ```

pub mod adjusted;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod expand;
pub mod hyperslab;
pub mod provider;
pub mod resolver;
pub mod testdata;

// Re-export commonly used types at crate root
pub use adjusted::{AdjustedField, AxisBinding, BufferState};
pub use cache::{AdjustedFieldCache, AdjustedId, CacheStats};
pub use catalog::DimensionMapCatalog;
pub use config::ResolverConfig;
pub use dataset::{Dataset, FieldId};
pub use expand::{expand, expanded_value_at, AxisMap, MAX_MAPPED_RANK};
pub use hyperslab::extract;
pub use provider::{ContainerProvider, FieldInventory, RawFieldBuffer};
pub use resolver::{ResolvedAssociation, ResolvedGeo};
