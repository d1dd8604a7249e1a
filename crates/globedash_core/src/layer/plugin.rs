//! Layer plugin contract and shared route helpers.

use crate::geo::{GeoCatalog, GeoPoint};
use crate::layer::{GlobeSurface, Rgba};
use log::debug;
use std::fmt::{Display, Formatter};

/// Identity of one toggleable data layer.
///
/// The string form is the key used under `layers` and `opacity` in the state
/// tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Flights,
    Shipping,
    Oceans,
    Borders,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [Self::Flights, Self::Shipping, Self::Oceans, Self::Borders];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Shipping => "shipping",
            Self::Oceans => "oceans",
            Self::Borders => "borders",
        }
    }

    /// Exact, lowercase state-key match.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn default_opacity(self) -> f64 {
        match self {
            Self::Flights | Self::Shipping => 0.7,
            Self::Oceans => 1.0,
            Self::Borders => 0.6,
        }
    }
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named route endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEndpoint {
    pub name: String,
    pub point: GeoPoint,
}

/// Connection between two catalog places plus rendering hints.
///
/// Regenerated from the catalog on demand; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub from: RouteEndpoint,
    pub to: RouteEndpoint,
    /// Intermediate points between `from` and `to`, if any.
    pub via: Vec<GeoPoint>,
    pub color: Rgba,
    pub label: String,
}

impl Route {
    /// `from`, then `via`, then `to`.
    pub fn points(&self) -> Vec<GeoPoint> {
        let mut points = Vec::with_capacity(self.via.len() + 2);
        points.push(self.from.point);
        points.extend(self.via.iter().copied());
        points.push(self.to.point);
        points
    }
}

/// One independently toggleable dataset drawn onto a [`GlobeSurface`].
///
/// A layer owns exactly one collection kind on the surface and never touches
/// another.
pub trait LayerPlugin {
    fn kind(&self) -> LayerKind;

    /// Pushes this layer's dataset. Calling it again with the same opacity
    /// leaves the surface unchanged.
    fn apply(&mut self, surface: &mut dyn GlobeSurface, opacity: f64);

    /// Clears this layer's collection. Always safe to call.
    fn remove(&mut self, surface: &mut dyn GlobeSurface);

    fn supports_opacity(&self) -> bool {
        false
    }

    /// Recolours the owned dataset without changing geometry.
    fn set_opacity(&mut self, _surface: &mut dyn GlobeSurface, _opacity: f64) {}

    /// Applies asynchronous completions that arrived since the last poll.
    fn poll(&mut self, _surface: &mut dyn GlobeSurface) {}

    /// Whether a load is still outstanding; `poll` will eventually resolve it.
    fn is_pending(&self) -> bool {
        false
    }
}

/// Clamps to `0..=1`; non-finite input becomes `0`.
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Static connection between two catalog cities.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Connection {
    pub from: &'static str,
    pub to: &'static str,
    pub via: &'static [GeoPoint],
}

/// Resolves `connections` against city names in `catalog`.
///
/// Connections with an unknown endpoint are skipped.
pub(crate) fn resolve_routes(
    catalog: &GeoCatalog,
    connections: &[Connection],
    color: Rgba,
) -> Vec<Route> {
    connections
        .iter()
        .filter_map(|connection| {
            let endpoint = |name: &str| {
                catalog.city(name).map(|city| RouteEndpoint {
                    name: city.name.to_string(),
                    point: GeoPoint::new(city.lat, city.lng),
                })
            };
            match (endpoint(connection.from), endpoint(connection.to)) {
                (Some(from), Some(to)) => Some(Route {
                    label: format!("{} → {}", from.name, to.name),
                    from,
                    to,
                    via: connection.via.to_vec(),
                    color,
                }),
                _ => {
                    debug!(
                        "event=route_resolve module=layer status=skipped from={} to={}",
                        connection.from, connection.to
                    );
                    None
                }
            }
        })
        .collect()
}
