//! Built-in reference tables.
//!
//! Coordinates are approximate centroids (countries, oceans) or city centres.

use crate::geo::model::{City, Country, GeoPoint, HistoricalRoute, Ocean};

pub(crate) const COUNTRIES: &[Country] = &[
    country("United States", "Washington, D.C.", "North America", 331_900_000, 39.8283, -98.5795),
    country("Canada", "Ottawa", "North America", 38_930_000, 56.1304, -106.3468),
    country("Mexico", "Mexico City", "North America", 126_700_000, 23.6345, -102.5528),
    country("Brazil", "Brasília", "South America", 214_300_000, -14.2350, -51.9253),
    country("Argentina", "Buenos Aires", "South America", 45_810_000, -38.4161, -63.6167),
    country("United Kingdom", "London", "Europe", 67_330_000, 55.3781, -3.4360),
    country("France", "Paris", "Europe", 67_750_000, 46.2276, 2.2137),
    country("Germany", "Berlin", "Europe", 83_200_000, 51.1657, 10.4515),
    country("Italy", "Rome", "Europe", 59_110_000, 41.8719, 12.5674),
    country("Spain", "Madrid", "Europe", 47_420_000, 40.4637, -3.7492),
    country("Netherlands", "Amsterdam", "Europe", 17_530_000, 52.1326, 5.2913),
    country("Russia", "Moscow", "Europe/Asia", 143_400_000, 61.5240, 105.3188),
    country("China", "Beijing", "Asia", 1_412_000_000, 35.8617, 104.1954),
    country("Japan", "Tokyo", "Asia", 125_700_000, 36.2048, 138.2529),
    country("India", "New Delhi", "Asia", 1_408_000_000, 20.5937, 78.9629),
    country("Singapore", "Singapore", "Asia", 5_450_000, 1.3521, 103.8198),
    country("United Arab Emirates", "Abu Dhabi", "Middle East", 9_365_000, 23.4241, 53.8478),
    country("Egypt", "Cairo", "Africa", 109_300_000, 26.8206, 30.8025),
    country("Nigeria", "Abuja", "Africa", 213_400_000, 9.0820, 8.6753),
    country("South Africa", "Pretoria", "Africa", 59_390_000, -30.5595, 22.9375),
    country("Australia", "Canberra", "Oceania", 25_690_000, -25.2744, 133.7751),
    country("New Zealand", "Wellington", "Oceania", 5_123_000, -40.9006, 174.8860),
];

pub(crate) const CITIES: &[City] = &[
    city("New York", "United States", 8_336_000, 40.7128, -74.0060),
    city("Los Angeles", "United States", 3_899_000, 34.0522, -118.2437),
    city("Chicago", "United States", 2_697_000, 41.8781, -87.6298),
    city("Toronto", "Canada", 2_794_000, 43.6532, -79.3832),
    city("Mexico City", "Mexico", 9_209_000, 19.4326, -99.1332),
    city("Panama City", "Panama", 880_000, 8.9824, -79.5199),
    city("São Paulo", "Brazil", 12_330_000, -23.5505, -46.6333),
    city("Buenos Aires", "Argentina", 3_121_000, -34.6037, -58.3816),
    city("London", "United Kingdom", 8_982_000, 51.5074, -0.1278),
    city("Paris", "France", 2_161_000, 48.8566, 2.3522),
    city("Berlin", "Germany", 3_645_000, 52.5200, 13.4050),
    city("Rome", "Italy", 2_873_000, 41.9028, 12.4964),
    city("Madrid", "Spain", 3_223_000, 40.4168, -3.7038),
    city("Rotterdam", "Netherlands", 651_000, 51.9244, 4.4777),
    city("Moscow", "Russia", 12_510_000, 55.7558, 37.6173),
    city("Cairo", "Egypt", 9_540_000, 30.0444, 31.2357),
    city("Lagos", "Nigeria", 15_390_000, 6.5244, 3.3792),
    city("Johannesburg", "South Africa", 5_635_000, -26.2041, 28.0473),
    city("Dubai", "United Arab Emirates", 3_331_000, 25.2048, 55.2708),
    city("Mumbai", "India", 20_410_000, 19.0760, 72.8777),
    city("Singapore", "Singapore", 5_450_000, 1.3521, 103.8198),
    city("Hong Kong", "China", 7_413_000, 22.3193, 114.1694),
    city("Shanghai", "China", 24_870_000, 31.2304, 121.4737),
    city("Beijing", "China", 21_540_000, 39.9042, 116.4074),
    city("Tokyo", "Japan", 13_960_000, 35.6762, 139.6503),
    city("Sydney", "Australia", 5_312_000, -33.8688, 151.2093),
];

pub(crate) const OCEANS: &[Ocean] = &[
    Ocean {
        name: "Pacific Ocean",
        area_km2: 165_250_000.0,
        avg_depth_m: 4_280.0,
        description: "Largest and deepest ocean, spanning from the Arctic to the Southern Ocean.",
        lat: 0.0,
        lng: -160.0,
    },
    Ocean {
        name: "Atlantic Ocean",
        area_km2: 106_460_000.0,
        avg_depth_m: 3_646.0,
        description: "Second-largest ocean, separating the Americas from Europe and Africa.",
        lat: 0.0,
        lng: -30.0,
    },
    Ocean {
        name: "Indian Ocean",
        area_km2: 70_560_000.0,
        avg_depth_m: 3_741.0,
        description: "Warmest ocean, bounded by Africa, Asia and Australia.",
        lat: -20.0,
        lng: 80.0,
    },
    Ocean {
        name: "Southern Ocean",
        area_km2: 21_960_000.0,
        avg_depth_m: 3_270.0,
        description: "Ocean encircling Antarctica, driven by the Antarctic Circumpolar Current.",
        lat: -60.0,
        lng: 0.0,
    },
    Ocean {
        name: "Arctic Ocean",
        area_km2: 14_060_000.0,
        avg_depth_m: 1_205.0,
        description: "Smallest and shallowest ocean, largely covered by sea ice.",
        lat: 80.0,
        lng: 0.0,
    },
];

pub(crate) const HISTORICAL_ROUTES: &[HistoricalRoute] = &[
    HistoricalRoute {
        name: "Silk Road",
        period: "2nd century BC - 15th century",
        description: "Overland trade network linking China with the Mediterranean.",
        waypoints: &[
            GeoPoint::new(34.3416, 108.9398),
            GeoPoint::new(39.6270, 66.9750),
            GeoPoint::new(33.3152, 44.3661),
            GeoPoint::new(41.0082, 28.9784),
        ],
    },
    HistoricalRoute {
        name: "Spice Route",
        period: "1st century - 18th century",
        description: "Maritime trade between the Malabar Coast, Arabia and Venice.",
        waypoints: &[
            GeoPoint::new(11.2588, 75.7804),
            GeoPoint::new(12.7855, 45.0187),
            GeoPoint::new(31.2001, 29.9187),
            GeoPoint::new(45.4408, 12.3155),
        ],
    },
    HistoricalRoute {
        name: "Columbus' First Voyage",
        period: "1492",
        description: "Crossing from Palos de la Frontera to the Bahamas.",
        waypoints: &[
            GeoPoint::new(37.2286, -6.8936),
            GeoPoint::new(28.1235, -15.4363),
            GeoPoint::new(24.0500, -74.5300),
        ],
    },
    HistoricalRoute {
        name: "Magellan-Elcano Circumnavigation",
        period: "1519 - 1522",
        description: "First circumnavigation of the globe.",
        waypoints: &[
            GeoPoint::new(36.7781, -6.3515),
            GeoPoint::new(-52.5, -69.0),
            GeoPoint::new(10.3157, 123.8854),
            GeoPoint::new(-34.3568, 18.4740),
            GeoPoint::new(36.7781, -6.3515),
        ],
    },
];

const fn country(
    name: &'static str,
    capital: &'static str,
    region: &'static str,
    population: u64,
    lat: f64,
    lng: f64,
) -> Country {
    Country {
        name,
        capital,
        region,
        population,
        lat,
        lng,
    }
}

const fn city(name: &'static str, country: &'static str, population: u64, lat: f64, lng: f64) -> City {
    City {
        name,
        country,
        population,
        lat,
        lng,
    }
}
