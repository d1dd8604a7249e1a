//! Static geographic reference data and pure queries over it.
//!
//! # Responsibility
//! - Hold immutable country, city, ocean and historical route tables.
//! - Answer name lookups, nearest-neighbour coordinate lookups and capped
//!   substring search.
//!
//! # Invariants
//! - Queries are pure; they are safe to call from any UI context.
//! - Coordinate lookup uses degree-space Euclidean distance with fixed
//!   10° (land) and 50° (ocean) thresholds.

mod catalog;
mod data;
mod model;

pub use catalog::{
    CountryInfo, GeoCatalog, GEO_SEARCH_LIMIT, LAND_MATCH_RADIUS_DEG, OCEAN_MATCH_RADIUS_DEG,
};
pub use model::{City, Country, GeoEntity, GeoPoint, HistoricalRoute, Ocean};
