//! Dispatch from state changes to registered layer plugins.

use crate::geo::GeoCatalog;
use crate::layer::{
    BoundaryFetcher, CountryBordersLayer, FlightLayer, GlobeSurface, LayerKind, LayerPlugin,
    OceanLayer, ShippingLayer,
};
use crate::state::{StatePath, StateTree};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Layer registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRegistryError {
    DuplicateLayer(LayerKind),
}

impl Display for LayerRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateLayer(kind) => write!(f, "layer already registered: {kind}"),
        }
    }
}

impl Error for LayerRegistryError {}

/// One plugin per [`LayerKind`], driven from [`StateTree`] values.
///
/// The registry does not subscribe to the store itself; the owner forwards
/// changes through [`LayerRegistry::apply_change`].
#[derive(Default)]
pub struct LayerRegistry<'a> {
    layers: BTreeMap<LayerKind, Box<dyn LayerPlugin + 'a>>,
}

impl<'a> LayerRegistry<'a> {
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
        }
    }

    /// Registry with the flight, shipping, ocean and border layers.
    pub fn with_builtin_layers(
        catalog: &'a GeoCatalog,
        fetcher: impl BoundaryFetcher + 'a,
    ) -> Self {
        let mut registry = Self::new();
        let builtin: [Box<dyn LayerPlugin + 'a>; 4] = [
            Box::new(FlightLayer::new(catalog)),
            Box::new(ShippingLayer::new(catalog)),
            Box::new(OceanLayer::new(catalog)),
            Box::new(CountryBordersLayer::new(fetcher)),
        ];
        for layer in builtin {
            registry.layers.insert(layer.kind(), layer);
        }
        registry
    }

    /// Registers one plugin under its own kind.
    pub fn register(
        &mut self,
        layer: Box<dyn LayerPlugin + 'a>,
    ) -> Result<(), LayerRegistryError> {
        let kind = layer.kind();
        if self.layers.contains_key(&kind) {
            return Err(LayerRegistryError::DuplicateLayer(kind));
        }
        self.layers.insert(kind, layer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.keys().copied().collect()
    }

    pub fn get(&self, kind: LayerKind) -> Option<&(dyn LayerPlugin + 'a)> {
        self.layers.get(&kind).map(|layer| layer.as_ref())
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> Option<&mut (dyn LayerPlugin + 'a)> {
        match self.layers.get_mut(&kind) {
            Some(layer) => Some(layer.as_mut()),
            None => None,
        }
    }

    /// Applies visible layers and removes hidden ones.
    pub fn sync(&mut self, tree: &StateTree, surface: &mut dyn GlobeSurface) {
        for (kind, layer) in &mut self.layers {
            if tree.is_layer_visible(*kind) {
                layer.apply(surface, tree.layer_opacity(*kind));
            } else {
                layer.remove(surface);
            }
        }
    }

    /// Reacts to one mutated path. Paths unrelated to layers are ignored.
    pub fn apply_change(
        &mut self,
        path: &StatePath,
        tree: &StateTree,
        surface: &mut dyn GlobeSurface,
    ) {
        match path {
            StatePath::Layer(name) => {
                let Some((kind, layer)) = self.lookup(name) else {
                    return;
                };
                if tree.is_layer_visible(kind) {
                    layer.apply(surface, tree.layer_opacity(kind));
                } else {
                    layer.remove(surface);
                }
            }
            StatePath::LayerOpacity(name) => {
                let Some((kind, layer)) = self.lookup(name) else {
                    return;
                };
                let opacity = tree.layer_opacity(kind);
                if layer.supports_opacity() {
                    layer.set_opacity(surface, opacity);
                } else if tree.is_layer_visible(kind) {
                    layer.apply(surface, opacity);
                }
            }
            StatePath::Layers | StatePath::Opacity | StatePath::All => self.sync(tree, surface),
            _ => {}
        }
    }

    /// Pumps asynchronous completions for every layer.
    pub fn poll(&mut self, surface: &mut dyn GlobeSurface) {
        for layer in self.layers.values_mut() {
            layer.poll(surface);
        }
    }

    /// Whether any layer still waits on an asynchronous load.
    pub fn has_pending(&self) -> bool {
        self.layers.values().any(|layer| layer.is_pending())
    }

    fn lookup(&mut self, name: &str) -> Option<(LayerKind, &mut Box<dyn LayerPlugin + 'a>)> {
        let Some(kind) = LayerKind::parse(name) else {
            debug!("event=layer_dispatch module=layer status=skipped layer={name}");
            return None;
        };
        self.layers.get_mut(&kind).map(|layer| (kind, layer))
    }
}
