//! Shipping lanes drawn as surface paths.

use crate::geo::{GeoCatalog, GeoPoint};
use crate::layer::plugin::{resolve_routes, Connection};
use crate::layer::{clamp_opacity, GlobeSurface, LayerKind, LayerPlugin, PathDatum, Rgba, Route};
use log::debug;
use once_cell::unsync::OnceCell;

const LANE_COLOR: Rgba = Rgba::rgb(0, 200, 255);

const MALACCA: GeoPoint = GeoPoint::new(2.5, 101.0);
const BAB_EL_MANDEB: GeoPoint = GeoPoint::new(12.6, 43.4);
const SUEZ: GeoPoint = GeoPoint::new(30.0, 32.55);
const GIBRALTAR: GeoPoint = GeoPoint::new(35.95, -5.6);
const CAPE_OF_GOOD_HOPE: GeoPoint = GeoPoint::new(-34.8, 20.0);
const MID_PACIFIC: GeoPoint = GeoPoint::new(30.0, -160.0);
const MID_ATLANTIC: GeoPoint = GeoPoint::new(46.0, -35.0);

const SHIPPING_LANES: &[Connection] = &[
    lane("Shanghai", "Rotterdam", &[MALACCA, BAB_EL_MANDEB, SUEZ, GIBRALTAR]),
    lane("Singapore", "Rotterdam", &[BAB_EL_MANDEB, SUEZ, GIBRALTAR]),
    lane("Shanghai", "Los Angeles", &[MID_PACIFIC]),
    lane("Hong Kong", "Los Angeles", &[MID_PACIFIC]),
    lane("Rotterdam", "New York", &[MID_ATLANTIC]),
    lane("Dubai", "Mumbai", &[]),
    lane("Singapore", "Sydney", &[]),
    lane("São Paulo", "Lagos", &[]),
    lane("Panama City", "Shanghai", &[MID_PACIFIC]),
    lane("Johannesburg", "Singapore", &[CAPE_OF_GOOD_HOPE]),
];

const fn lane(from: &'static str, to: &'static str, via: &'static [GeoPoint]) -> Connection {
    Connection { from, to, via }
}

/// Major container lanes between catalog ports.
pub struct ShippingLayer<'a> {
    catalog: &'a GeoCatalog,
    routes: OnceCell<Vec<Route>>,
    active: bool,
    opacity: f64,
}

impl<'a> ShippingLayer<'a> {
    pub fn new(catalog: &'a GeoCatalog) -> Self {
        Self {
            catalog,
            routes: OnceCell::new(),
            active: false,
            opacity: LayerKind::Shipping.default_opacity(),
        }
    }

    pub fn routes(&self) -> &[Route] {
        self.routes
            .get_or_init(|| resolve_routes(self.catalog, SHIPPING_LANES, LANE_COLOR))
    }

    fn paths(&self) -> Vec<PathDatum> {
        self.routes()
            .iter()
            .map(|route| PathDatum {
                points: route.points(),
                color: route.color.with_alpha(self.opacity),
                label: route.label.clone(),
            })
            .collect()
    }
}

impl LayerPlugin for ShippingLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Shipping
    }

    fn apply(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        self.active = true;
        let paths = self.paths();
        debug!(
            "event=layer_apply module=layer status=ok layer=shipping paths={}",
            paths.len()
        );
        surface.set_paths(paths);
    }

    fn remove(&mut self, surface: &mut dyn GlobeSurface) {
        self.active = false;
        surface.set_paths(Vec::new());
    }

    fn supports_opacity(&self) -> bool {
        true
    }

    fn set_opacity(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        if self.active {
            surface.set_paths(self.paths());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ShippingLayer, SHIPPING_LANES, SUEZ};
    use crate::geo::GeoCatalog;

    #[test]
    fn lanes_keep_their_waypoints_in_order() {
        let layer = ShippingLayer::new(GeoCatalog::builtin());
        let routes = layer.routes();
        assert_eq!(routes.len(), SHIPPING_LANES.len());

        let shanghai_rotterdam = &routes[0];
        let points = shanghai_rotterdam.points();
        assert_eq!(points.len(), 6);
        assert_eq!(points[3], SUEZ);
        assert_eq!(shanghai_rotterdam.to.name, "Rotterdam");
    }
}
