//! Engine configuration.
//!
//! Every field has a serde default so partial JSON or TOML documents load
//! cleanly; unknown fields are rejected.
use serde::de::Error;

/// Upper bound on the number of cell rows requested from the backend.
///
/// The number of rows equals the number of distinct geohash prefixes the
/// bounds and zoom imply, so this is effectively a cap on viewport size.
pub const DEFAULT_MAX_ROWS: usize = 300_000;

/// Clustering configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Row cap sent with every grouped query
    #[serde(default = "Config::default_max_rows")]
    pub max_rows: usize,

    /// First zoom level at which small groups are rendered member by member
    #[serde(default = "Config::default_group_zoom_threshold")]
    pub group_zoom_threshold: u8,

    /// Largest group kept as individual points below the threshold
    #[serde(default = "Config::default_low_zoom_group_size")]
    pub low_zoom_group_size: usize,

    /// Largest group kept as individual points at or above the threshold
    #[serde(default = "Config::default_high_zoom_group_size")]
    pub high_zoom_group_size: usize,

    /// Whether the backend returns cells in ascending geohash order.
    ///
    /// When false the ingestor always sorts; when true it verifies the order
    /// and only sorts if the guarantee turns out to be broken.
    #[serde(default)]
    pub backend_sorted: bool,

    /// Ask the backend for per-cell mean coordinates
    #[serde(default = "Config::default_stats_enabled")]
    pub stats_enabled: bool,
}

impl Config {
    const fn default_max_rows() -> usize {
        DEFAULT_MAX_ROWS
    }

    const fn default_group_zoom_threshold() -> u8 {
        18
    }

    const fn default_low_zoom_group_size() -> usize {
        1
    }

    const fn default_high_zoom_group_size() -> usize {
        10
    }

    const fn default_stats_enabled() -> bool {
        true
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        assert!(max_rows > 0, "Row cap must be greater than zero");
        self.max_rows = max_rows;
        self
    }

    pub fn with_group_zoom_threshold(mut self, zoom: u8) -> Self {
        self.group_zoom_threshold = zoom;
        self
    }

    pub fn with_group_sizes(mut self, low_zoom: usize, high_zoom: usize) -> Self {
        assert!(
            low_zoom > 0 && high_zoom > 0,
            "Group sizes must be greater than zero"
        );
        self.low_zoom_group_size = low_zoom;
        self.high_zoom_group_size = high_zoom;
        self
    }

    pub fn with_backend_sorted(mut self, sorted: bool) -> Self {
        self.backend_sorted = sorted;
        self
    }

    pub fn with_stats_enabled(mut self, enabled: bool) -> Self {
        self.stats_enabled = enabled;
        self
    }

    /// Largest number of documents a cell may hold and still be drawn
    /// point by point at `zoom`.
    pub fn max_group_size(&self, zoom: u8) -> usize {
        if zoom < self.group_zoom_threshold {
            self.low_zoom_group_size
        } else {
            self.high_zoom_group_size
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_rows == 0 {
            return Err("Row cap must be greater than zero".to_string());
        }

        if self.low_zoom_group_size == 0 || self.high_zoom_group_size == 0 {
            return Err("Group sizes must be greater than zero".to_string());
        }

        if self.max_rows > 10 * DEFAULT_MAX_ROWS {
            log::warn!(
                "Row cap of {} is far above the default of {} and may allow very large responses",
                self.max_rows,
                DEFAULT_MAX_ROWS
            );
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_rows: Self::default_max_rows(),
            group_zoom_threshold: Self::default_group_zoom_threshold(),
            low_zoom_group_size: Self::default_low_zoom_group_size(),
            high_zoom_group_size: Self::default_high_zoom_group_size(),
            backend_sorted: false,
            stats_enabled: Self::default_stats_enabled(),
        }
    }
}
