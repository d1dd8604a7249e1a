//! Geo reference records.

use crate::search::{ResultEntry, ResultKind};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Unweighted Euclidean distance in degree space.
    ///
    /// Not a great-circle distance; lookup thresholds are defined in these units.
    pub fn degree_distance(self, other: GeoPoint) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub capital: &'static str,
    pub region: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ocean {
    pub name: &'static str,
    pub area_km2: f64,
    pub avg_depth_m: f64,
    pub description: &'static str,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRoute {
    pub name: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub waypoints: &'static [GeoPoint],
}

/// Borrowed catalog record of any searchable kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeoEntity<'a> {
    Country(&'a Country),
    City(&'a City),
    Ocean(&'a Ocean),
}

impl GeoEntity<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Country(country) => country.name,
            Self::City(city) => city.name,
            Self::Ocean(ocean) => ocean.name,
        }
    }

    pub fn point(&self) -> GeoPoint {
        match self {
            Self::Country(country) => GeoPoint::new(country.lat, country.lng),
            Self::City(city) => GeoPoint::new(city.lat, city.lng),
            Self::Ocean(ocean) => GeoPoint::new(ocean.lat, ocean.lng),
        }
    }

    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Country(_) => ResultKind::Country,
            Self::City(_) => ResultKind::City,
            Self::Ocean(_) => ResultKind::Ocean,
        }
    }

    /// Projects the entity into the shape stored in `searchResults`.
    pub fn to_result_entry(&self) -> ResultEntry {
        let subtitle = match self {
            Self::Country(country) => format!("{} · capital {}", country.region, country.capital),
            Self::City(city) => city.country.to_string(),
            Self::Ocean(ocean) => ocean.description.to_string(),
        };
        let kind = self.kind();
        ResultEntry {
            id: format!("{}:{}", kind.as_str(), self.name().to_lowercase().replace(' ', "-")),
            kind,
            title: self.name().to_string(),
            subtitle: Some(subtitle),
            location: Some(self.point()),
        }
    }
}
