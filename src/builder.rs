//! Builder for clustering engines

use crate::clusterer::Clusterer;
use crate::config::Config;
use crate::error::Result;

/// Builder for a [`Clusterer`] with custom configuration.
#[derive(Debug, Default)]
pub struct ClustererBuilder {
    config: Config,
}

impl ClustererBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.config = self.config.with_max_rows(max_rows);
        self
    }

    /// Group sizes below and at/above the zoom threshold.
    pub fn group_sizes(mut self, low_zoom: usize, high_zoom: usize) -> Self {
        self.config = self.config.with_group_sizes(low_zoom, high_zoom);
        self
    }

    pub fn group_zoom_threshold(mut self, zoom: u8) -> Self {
        self.config = self.config.with_group_zoom_threshold(zoom);
        self
    }

    /// Trust the backend to return cells in geohash order.
    pub fn backend_sorted(mut self, sorted: bool) -> Self {
        self.config = self.config.with_backend_sorted(sorted);
        self
    }

    pub fn stats_enabled(mut self, enabled: bool) -> Self {
        self.config = self.config.with_stats_enabled(enabled);
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<Clusterer> {
        Clusterer::new(self.config)
    }
}
