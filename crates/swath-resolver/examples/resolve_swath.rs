//! Resolve geolocation for a synthetic swath and read subsets of it.
//!
//! Run with: cargo run --example resolve_swath

use swath_resolver::testdata::{plane, MemoryContainer};
use swath_resolver::{Dataset, ResolverConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // A MODIS-style layout: the data field is stored at full rate, the
    // geolocation fields at half rate along both axes.
    let container = MemoryContainer::new()
        .dimension_map("Coarse_Track", "Track", 0, 2)
        .dimension_map("Coarse_Scan", "Scan", 0, 2)
        .geo_field_f32(
            "Latitude",
            &[("Coarse_Track", 4), ("Coarse_Scan", 5)],
            &plane(4, 5),
        )
        .geo_field_f32(
            "Longitude",
            &[("Coarse_Track", 4), ("Coarse_Scan", 5)],
            &plane(4, 5).iter().map(|v| -v).collect::<Vec<_>>(),
        )
        .data_field_i16(
            "Radiance",
            &[("Track", 7), ("Scan", 9)],
            &vec![300.0; 63],
        );

    let mut dataset = Dataset::open(Box::new(container), ResolverConfig::from_env())?;

    for (source, served) in dataset.get_associated_geo_fields("Radiance")? {
        println!("geolocation field {source} is served as {served}");
        let shape = dataset.field_shape(&served)?;
        println!("  resolved shape: {shape:?}");

        // Whole field, then a strided subset of it.
        let full = dataset.read_field_full(&served)?;
        println!("  first row: {:?}", &full[..shape[1]]);

        let subset = dataset.read_field(&served, &[1, 1], &[3, 4], &[2, 2])?;
        println!("  subset [1..;2, 1..;2]: {subset:?}");
    }

    println!("cache stats: {:?}", dataset.cache_stats());
    Ok(())
}
