//! Core globe state and layer system for globedash.
//! This crate is the single source of truth for globe state invariants.

pub mod config;
pub mod db;
pub mod geo;
pub mod layer;
pub mod logging;
pub mod search;
pub mod state;

pub use config::{ConfigError, ConfigResult, GlobeConfig};
pub use geo::{CountryInfo, GeoCatalog, GeoEntity, GeoPoint};
pub use layer::{
    BoundaryFetcher, CountryBordersLayer, FlightLayer, GeoJsonFileFetcher, GlobeSurface,
    InMemorySurface, LayerKind, LayerPlugin, LayerRegistry, LayerRegistryError, OceanLayer,
    ShippingLayer,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use search::{
    DebouncedSearch, RecordKind, ResultEntry, ResultKind, SearchFilter, SearchIndex, SearchRecord,
    SearchRequest,
};
pub use state::{
    MemoryStateStorage, NewPin, Pin, SqliteStateStorage, StateChange, StateError, StatePath,
    StateResult, StateStorage, StateStore, StateTree, StorageError, Subscription,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
