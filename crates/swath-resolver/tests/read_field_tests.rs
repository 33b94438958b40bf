//! End-to-end tests of hyperslab reads against resolved fields.

use swath_core::SwathError;
use swath_resolver::testdata::{ramp, MemoryContainer};
use swath_resolver::{expand, expanded_value_at, extract, AxisMap, Dataset, ResolverConfig};

// ============================================================================
// Worked examples
// ============================================================================

#[test]
fn test_interpolated_subset_worked_example() {
    // Source [0,10,20,30] under map (offset=0, increment=2) expands to
    // [0,5,10,15,20,25,30]; the slab (offset=1, count=3, stride=2) of that
    // is [5,15,25].
    let container = MemoryContainer::new()
        .dimension_map("Coarse_Track", "Track", 0, 2)
        .geo_field_f32("Latitude", &[("Coarse_Track", 4)], &[0.0, 10.0, 20.0, 30.0])
        .data_field_f32("Science", &[("Track", 7)], &ramp(7));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    let full = dataset.read_field_full("Latitude").unwrap();
    assert_eq!(full, vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);

    let subset = dataset.read_field("Latitude", &[1], &[3], &[2]).unwrap();
    assert_eq!(subset, vec![5.0, 15.0, 25.0]);
}

#[test]
fn test_subsampled_geolocation() {
    // The geolocation axis is finer than the data axis: a negative
    // increment decimates [0..8) down to [0,2,4,6].
    let container = MemoryContainer::new()
        .dimension_map("Fine_Track", "Track", 0, -2)
        .geo_field_f32("Latitude", &[("Fine_Track", 8)], &ramp(8))
        .data_field_f32("Science", &[("Track", 4)], &ramp(4));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    let full = dataset.read_field_full("Latitude").unwrap();
    assert_eq!(full, vec![0.0, 2.0, 4.0, 6.0]);
}

// ============================================================================
// Subsetting composition
// ============================================================================

#[test]
fn test_extract_of_expansion_matches_direct_evaluation() {
    let base: Vec<f64> = (0..20).map(|v| ((v * 7) % 13) as f64).collect();
    let base_shape = [4, 5];
    let maps = vec![AxisMap::new(0, 7, 0, 2), AxisMap::new(1, 9, 0, 2)];

    let (expanded, shape) = expand(&base, &base_shape, &maps).unwrap();
    assert_eq!(shape, vec![7, 9]);

    let offset = [1, 2];
    let count = [3, 3];
    let stride = [2, 2];
    let slab = extract(&expanded, &shape, &offset, &count, &stride).unwrap();

    let mut k = 0;
    for r in 0..count[0] {
        for c in 0..count[1] {
            let index = [offset[0] + r * stride[0], offset[1] + c * stride[1]];
            let direct = expanded_value_at(&base, &base_shape, &maps, &index).unwrap();
            assert!(
                (slab[k] - direct).abs() < 1e-12,
                "slab[{}] = {} but direct evaluation gives {}",
                k,
                slab[k],
                direct
            );
            k += 1;
        }
    }
}

// ============================================================================
// Plain reads
// ============================================================================

#[test]
fn test_unmapped_read_is_plain_hyperslab() {
    let container = MemoryContainer::new()
        .geo_field_f64("Longitude", &[("Track", 6)], &[-10.0, -8.0, -6.0, -4.0, -2.0, 0.0])
        .data_field_f32("Science", &[("Track", 6)], &ramp(6));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    let subset = dataset.read_field("Longitude", &[1], &[2], &[3]).unwrap();
    assert_eq!(subset, vec![-8.0, -2.0]);
    // No adjusted field was ever materialized for this read
    assert_eq!(dataset.cache_stats().materializations, 0);
    assert_eq!(dataset.cache_stats().entries, 0);
}

#[test]
fn test_integer_data_promotes_losslessly() {
    let container = MemoryContainer::new()
        .geo_field_f32("Latitude", &[("Track", 4)], &ramp(4))
        .data_field_i16("Counts", &[("Track", 4)], &[-3.0, 0.0, 1200.0, 32000.0]);

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    let counts = dataset.read_field_full("Counts").unwrap();
    assert_eq!(counts, vec![-3.0, 0.0, 1200.0, 32000.0]);
}

// ============================================================================
// Request validation
// ============================================================================

#[test]
fn test_out_of_bounds_request_rejected() {
    let container = MemoryContainer::new()
        .dimension_map("Coarse_Track", "Track", 0, 2)
        .geo_field_f32("Latitude", &[("Coarse_Track", 4)], &ramp(4))
        .data_field_f32("Science", &[("Track", 7)], &ramp(7));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    // The adjusted field has 7 samples; offset 4 with count 2 stride 3
    // would reach index 7.
    let result = dataset.read_field("Latitude", &[4], &[2], &[3]);
    assert!(matches!(result, Err(SwathError::Range { .. })));

    // A failed request leaves the resolved buffer servable
    let full = dataset.read_field_full("Latitude").unwrap();
    assert_eq!(full.len(), 7);
}

#[test]
fn test_unknown_field_rejected() {
    let container = MemoryContainer::new()
        .geo_field_f32("Latitude", &[("Track", 4)], &ramp(4))
        .data_field_f32("Science", &[("Track", 4)], &ramp(4));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();
    let result = dataset.read_field("Altitude", &[0], &[1], &[1]);
    assert!(matches!(result, Err(SwathError::FieldNotFound(_))));
}

#[test]
fn test_raw_buffer_drop_and_reread() {
    let container = MemoryContainer::new()
        .geo_field_f32("Latitude", &[("Track", 4)], &[1.0, 2.0, 3.0, 4.0])
        .data_field_f32("Science", &[("Track", 4)], &ramp(4));

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::default()).unwrap();

    let first = dataset.read_field_full("Latitude").unwrap();
    dataset.drop_raw_buffer("Latitude").unwrap();
    let second = dataset.read_field_full("Latitude").unwrap();
    assert_eq!(first, second);
}
