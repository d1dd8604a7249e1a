//! Geospatial data layers composed onto one shared globe surface.
//!
//! # Responsibility
//! - Define the [`LayerPlugin`] contract and the [`GlobeSurface`] boundary.
//! - Provide the flight, shipping, ocean and country border layers.
//! - Dispatch layer visibility and opacity changes through [`LayerRegistry`].
//!
//! # Invariants
//! - Each layer replaces only its own collection; applying twice never
//!   duplicates data.
//! - Opacity is clamped to `0..=1` before it reaches a colour.
//! - Border completions are applied on [`LayerPlugin::poll`], never inline.

mod borders;
mod color;
mod flights;
mod oceans;
mod plugin;
mod registry;
mod shipping;
mod surface;

pub use borders::{
    parse_geojson_boundaries, BoundaryFetcher, CountryBordersLayer, CountryBoundary,
    FetchCompletion, FetchError, FetchResult, FetchTicket, GeoJsonFileFetcher,
};
pub use color::Rgba;
pub use flights::FlightLayer;
pub use oceans::OceanLayer;
pub use plugin::{clamp_opacity, LayerKind, LayerPlugin, Route, RouteEndpoint};
pub use registry::{LayerRegistry, LayerRegistryError};
pub use shipping::ShippingLayer;
pub use surface::{
    ArcDatum, GlobeSurface, InMemorySurface, LabelDatum, PathDatum, PolygonDatum,
};
