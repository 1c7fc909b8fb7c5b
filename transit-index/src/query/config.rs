//! Result limits for queries.

/// Configuration parameters for search queries.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Maximum number of results `search` returns after deduplication.
    pub max_search_results: usize,

    /// Maximum number of trips emitted for a recognised train number.
    pub max_train_results: usize,

    /// Maximum number of stops `search_stations` returns.
    pub max_station_results: usize,
}

impl QueryConfig {
    /// Create a new configuration with the given limits.
    pub fn new(
        max_search_results: usize,
        max_train_results: usize,
        max_station_results: usize,
    ) -> Self {
        Self {
            max_search_results,
            max_train_results,
            max_station_results,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_search_results: 20,
            max_train_results: 5,
            max_station_results: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QueryConfig::default();

        assert_eq!(config.max_search_results, 20);
        assert_eq!(config.max_train_results, 5);
        assert_eq!(config.max_station_results, 10);
    }

    #[test]
    fn custom_config() {
        let config = QueryConfig::new(3, 1, 2);

        assert_eq!(config.max_search_results, 3);
        assert_eq!(config.max_train_results, 1);
        assert_eq!(config.max_station_results, 2);
    }
}
