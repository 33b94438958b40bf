//! Dimension maps relating geolocation axes to data axes.

use serde::{Deserialize, Serialize};

/// A declared relation between a geolocation-field axis and a data-field
/// axis stored at a different sampling rate.
///
/// For a positive increment the geolocation axis is the coarser one: data
/// index `j` corresponds to geolocation index `(j - offset) / increment`.
/// For a negative increment the geolocation axis is the finer one and the
/// magnitude is the decimation factor. An increment of zero is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionMap {
    /// Axis name on the geolocation field.
    pub geo_dim: String,
    /// Axis name on the data field.
    pub data_dim: String,
    /// Index of the data sample matching the first geolocation sample.
    pub offset: i64,
    /// Sampling-rate ratio between the two axes (non-zero).
    pub increment: i64,
}

impl DimensionMap {
    /// Create a dimension map.
    pub fn new(
        geo_dim: impl Into<String>,
        data_dim: impl Into<String>,
        offset: i64,
        increment: i64,
    ) -> Self {
        Self {
            geo_dim: geo_dim.into(),
            data_dim: data_dim.into(),
            offset,
            increment,
        }
    }

    /// Synthesize the identity map for an axis with no declared map.
    pub fn identity(dim: impl Into<String>) -> Self {
        let dim = dim.into();
        Self {
            geo_dim: dim.clone(),
            data_dim: dim,
            offset: 0,
            increment: 1,
        }
    }

    /// Whether this is a synthesized identity map, meaning no resampling
    /// is needed along the axis.
    pub fn is_identity(&self) -> bool {
        self.geo_dim == self.data_dim && self.offset == 0 && self.increment == 1
    }
}
