//! Lookup and search over the immutable geo tables.
//!
//! # Invariants
//! - Tables never change after construction.
//! - Table order is the tie-break for every query.
//! - Lookup misses are `None`/empty, never errors.

use crate::geo::data::{CITIES, COUNTRIES, HISTORICAL_ROUTES, OCEANS};
use crate::geo::model::{City, Country, GeoEntity, GeoPoint, HistoricalRoute, Ocean};
use once_cell::sync::Lazy;
use serde::Serialize;

/// Land matches must be strictly closer than this many degrees.
pub const LAND_MATCH_RADIUS_DEG: f64 = 10.0;
/// Ocean fallback matches must be strictly closer than this many degrees.
pub const OCEAN_MATCH_RADIUS_DEG: f64 = 50.0;
/// Maximum entities returned by [`GeoCatalog::search`].
pub const GEO_SEARCH_LIMIT: usize = 10;

static BUILTIN: Lazy<GeoCatalog> = Lazy::new(|| {
    GeoCatalog::new(
        COUNTRIES.to_vec(),
        CITIES.to_vec(),
        OCEANS.to_vec(),
        HISTORICAL_ROUTES.to_vec(),
    )
});

/// Country record with a generated human-readable summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryInfo<'a> {
    #[serde(flatten)]
    pub country: &'a Country,
    pub description: String,
}

/// Static countries, cities, oceans and historical routes.
#[derive(Debug, Clone, Default)]
pub struct GeoCatalog {
    countries: Vec<Country>,
    cities: Vec<City>,
    oceans: Vec<Ocean>,
    routes: Vec<HistoricalRoute>,
}

impl GeoCatalog {
    pub fn new(
        countries: Vec<Country>,
        cities: Vec<City>,
        oceans: Vec<Ocean>,
        routes: Vec<HistoricalRoute>,
    ) -> Self {
        Self {
            countries,
            cities,
            oceans,
            routes,
        }
    }

    /// Process-wide built-in catalog, built on first use.
    pub fn builtin() -> &'static GeoCatalog {
        &BUILTIN
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn oceans(&self) -> &[Ocean] {
        &self.oceans
    }

    pub fn historical_routes(&self) -> &[HistoricalRoute] {
        &self.routes
    }

    /// Case-insensitive exact route name lookup.
    pub fn historical_route(&self, name: &str) -> Option<&HistoricalRoute> {
        let needle = name.trim();
        self.routes
            .iter()
            .find(|route| route.name.eq_ignore_ascii_case(needle))
    }

    /// Case-insensitive exact city name lookup.
    pub fn city(&self, name: &str) -> Option<&City> {
        let needle = name.trim().to_lowercase();
        self.cities
            .iter()
            .find(|city| city.name.to_lowercase() == needle)
    }

    /// First country whose name contains `name` (case-insensitive).
    pub fn country_info(&self, name: &str) -> Option<CountryInfo<'_>> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let country = self
            .countries
            .iter()
            .find(|country| country.name.to_lowercase().contains(&needle))?;

        Some(CountryInfo {
            country,
            description: describe_country(country),
        })
    }

    /// Nearest land entity within [`LAND_MATCH_RADIUS_DEG`], else nearest
    /// ocean within [`OCEAN_MATCH_RADIUS_DEG`].
    pub fn location_by_coords(&self, lat: f64, lng: f64) -> Option<GeoEntity<'_>> {
        let query_point = GeoPoint::new(lat, lng);

        let land = self
            .countries
            .iter()
            .map(GeoEntity::Country)
            .chain(self.cities.iter().map(GeoEntity::City));
        if let Some(entity) = nearest_within(land, query_point, LAND_MATCH_RADIUS_DEG) {
            return Some(entity);
        }

        nearest_within(
            self.oceans.iter().map(GeoEntity::Ocean),
            query_point,
            OCEAN_MATCH_RADIUS_DEG,
        )
    }

    /// Substring search: countries, then cities, then oceans; at most
    /// [`GEO_SEARCH_LIMIT`] entities. Blank queries match nothing.
    pub fn search(&self, query: &str) -> Vec<GeoEntity<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let hit = |field: &str| field.to_lowercase().contains(&needle);

        let countries = self
            .countries
            .iter()
            .filter(|c| hit(c.name) || hit(c.capital) || hit(c.region))
            .map(GeoEntity::Country);
        let cities = self
            .cities
            .iter()
            .filter(|c| hit(c.name) || hit(c.country))
            .map(GeoEntity::City);
        let oceans = self
            .oceans
            .iter()
            .filter(|o| hit(o.name))
            .map(GeoEntity::Ocean);

        countries
            .chain(cities)
            .chain(oceans)
            .take(GEO_SEARCH_LIMIT)
            .collect()
    }
}

fn nearest_within<'a>(
    candidates: impl Iterator<Item = GeoEntity<'a>>,
    query_point: GeoPoint,
    radius: f64,
) -> Option<GeoEntity<'a>> {
    let mut best: Option<(f64, GeoEntity<'a>)> = None;
    for entity in candidates {
        let distance = entity.point().degree_distance(query_point);
        if best.map_or(true, |(closest, _)| distance < closest) {
            best = Some((distance, entity));
        }
    }
    best.filter(|(distance, _)| *distance < radius)
        .map(|(_, entity)| entity)
}

fn describe_country(country: &Country) -> String {
    format!(
        "{} is a country in {} with its capital in {} and a population of about {}.",
        country.name,
        country.region,
        country.capital,
        format_population(country.population)
    )
}

fn format_population(population: u64) -> String {
    let value = population as f64;
    if value >= 1e9 {
        format!("{:.2} billion", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1} million", value / 1e6)
    } else {
        population.to_string()
    }
}
