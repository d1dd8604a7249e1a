//! Ocean name labels.

use crate::geo::{GeoCatalog, GeoPoint};
use crate::layer::{clamp_opacity, GlobeSurface, LabelDatum, LayerKind, LayerPlugin, Rgba};

const LABEL_COLOR: Rgba = Rgba::rgb(255, 255, 255);
const BASE_LABEL_SIZE: f64 = 0.8;
const AREA_PER_SIZE_UNIT_KM2: f64 = 100e6;

/// One label per catalog ocean, sized by area.
pub struct OceanLayer<'a> {
    catalog: &'a GeoCatalog,
    active: bool,
    opacity: f64,
}

impl<'a> OceanLayer<'a> {
    pub fn new(catalog: &'a GeoCatalog) -> Self {
        Self {
            catalog,
            active: false,
            opacity: LayerKind::Oceans.default_opacity(),
        }
    }

    fn labels(&self) -> Vec<LabelDatum> {
        let color = LABEL_COLOR.with_alpha(self.opacity);
        self.catalog
            .oceans()
            .iter()
            .map(|ocean| LabelDatum {
                position: GeoPoint::new(ocean.lat, ocean.lng),
                text: ocean.name.to_string(),
                size: BASE_LABEL_SIZE + ocean.area_km2 / AREA_PER_SIZE_UNIT_KM2,
                color,
            })
            .collect()
    }
}

impl LayerPlugin for OceanLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Oceans
    }

    fn apply(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        self.active = true;
        surface.set_labels(self.labels());
    }

    fn remove(&mut self, surface: &mut dyn GlobeSurface) {
        self.active = false;
        surface.set_labels(Vec::new());
    }

    fn supports_opacity(&self) -> bool {
        true
    }

    fn set_opacity(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        if self.active {
            surface.set_labels(self.labels());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OceanLayer;
    use crate::geo::GeoCatalog;
    use crate::layer::{GlobeSurface, InMemorySurface, LayerPlugin};

    #[test]
    fn larger_oceans_get_larger_labels() {
        let mut layer = OceanLayer::new(GeoCatalog::builtin());
        let mut surface = InMemorySurface::new();
        layer.apply(&mut surface, 1.0);

        let labels = surface.labels();
        assert_eq!(labels.len(), 5);
        let pacific = labels.iter().find(|l| l.text == "Pacific Ocean").unwrap();
        let arctic = labels.iter().find(|l| l.text == "Arctic Ocean").unwrap();
        assert!(pacific.size > arctic.size);
        assert!(arctic.size > 0.8);
    }
}
