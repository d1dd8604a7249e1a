//! Flight connections drawn as arcs.

use crate::geo::GeoCatalog;
use crate::layer::plugin::{resolve_routes, Connection};
use crate::layer::{clamp_opacity, ArcDatum, GlobeSurface, LayerKind, LayerPlugin, Rgba, Route};
use log::debug;
use once_cell::unsync::OnceCell;

const ARC_START_COLOR: Rgba = Rgba::rgb(255, 170, 0);
const ARC_END_COLOR: Rgba = Rgba::rgb(255, 80, 80);

const FLIGHT_CONNECTIONS: &[Connection] = &[
    flight("New York", "London"),
    flight("London", "Dubai"),
    flight("Dubai", "Singapore"),
    flight("Singapore", "Sydney"),
    flight("Los Angeles", "Tokyo"),
    flight("Tokyo", "Hong Kong"),
    flight("Paris", "New York"),
    flight("São Paulo", "Madrid"),
    flight("Johannesburg", "Dubai"),
    flight("Moscow", "Beijing"),
    flight("Mumbai", "London"),
    flight("Chicago", "Mexico City"),
    flight("Toronto", "Paris"),
    flight("Cairo", "Rome"),
    flight("Lagos", "London"),
];

const fn flight(from: &'static str, to: &'static str) -> Connection {
    Connection { from, to, via: &[] }
}

/// Major air connections between catalog cities.
pub struct FlightLayer<'a> {
    catalog: &'a GeoCatalog,
    routes: OnceCell<Vec<Route>>,
    active: bool,
    opacity: f64,
}

impl<'a> FlightLayer<'a> {
    pub fn new(catalog: &'a GeoCatalog) -> Self {
        Self {
            catalog,
            routes: OnceCell::new(),
            active: false,
            opacity: LayerKind::Flights.default_opacity(),
        }
    }

    /// Routes resolved from the catalog; built on first use.
    pub fn routes(&self) -> &[Route] {
        self.routes
            .get_or_init(|| resolve_routes(self.catalog, FLIGHT_CONNECTIONS, ARC_START_COLOR))
    }

    fn arcs(&self) -> Vec<ArcDatum> {
        let colors = [
            ARC_START_COLOR.with_alpha(self.opacity),
            ARC_END_COLOR.with_alpha(self.opacity),
        ];
        self.routes()
            .iter()
            .map(|route| ArcDatum {
                start: route.from.point,
                end: route.to.point,
                colors,
                label: route.label.clone(),
            })
            .collect()
    }
}

impl LayerPlugin for FlightLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Flights
    }

    fn apply(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        self.active = true;
        let arcs = self.arcs();
        debug!(
            "event=layer_apply module=layer status=ok layer=flights arcs={}",
            arcs.len()
        );
        surface.set_arcs(arcs);
    }

    fn remove(&mut self, surface: &mut dyn GlobeSurface) {
        self.active = false;
        surface.set_arcs(Vec::new());
    }

    fn supports_opacity(&self) -> bool {
        true
    }

    fn set_opacity(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        if self.active {
            surface.set_arcs(self.arcs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FlightLayer, FLIGHT_CONNECTIONS};
    use crate::geo::GeoCatalog;
    use crate::layer::{GlobeSurface, InMemorySurface, LayerPlugin};

    #[test]
    fn every_connection_resolves_against_builtin_catalog() {
        let layer = FlightLayer::new(GeoCatalog::builtin());
        assert_eq!(layer.routes().len(), FLIGHT_CONNECTIONS.len());
    }

    #[test]
    fn set_opacity_while_inactive_leaves_surface_alone() {
        let mut layer = FlightLayer::new(GeoCatalog::builtin());
        let mut surface = InMemorySurface::new();

        layer.set_opacity(&mut surface, 0.3);
        assert!(surface.arcs().is_empty());

        layer.apply(&mut surface, 0.5);
        assert!(surface.arcs().iter().all(|arc| arc.colors[0].a == 0.5));
    }
}
