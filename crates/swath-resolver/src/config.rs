//! Configuration for the resolution engine.

use serde::{Deserialize, Serialize};

/// Configuration for a swath dataset's resolution engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Memory budget for resident adjusted buffers in megabytes.
    pub adjusted_cache_mb: usize,

    /// Whether a base geolocation field consistently adjusted to a single
    /// identity is served under its own logical name instead of the
    /// mangled one.
    pub override_geo_fields: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            adjusted_cache_mb: 256,
            override_geo_fields: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SWATH_ADJUSTED_CACHE_MB") {
            if let Ok(size) = val.parse() {
                config.adjusted_cache_mb = size;
            }
        }

        if let Ok(val) = std::env::var("SWATH_OVERRIDE_GEOFIELDS") {
            config.override_geo_fields = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.adjusted_cache_mb == 0 {
            return Err("adjusted_cache_mb must be > 0".to_string());
        }
        Ok(())
    }

    /// Get the adjusted-buffer cache size in bytes.
    pub fn adjusted_cache_bytes(&self) -> usize {
        self.adjusted_cache_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.adjusted_cache_mb, 256);
        assert!(config.override_geo_fields);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = ResolverConfig {
            adjusted_cache_mb: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
