//! Serializable globe state tree.
//!
//! # Invariants
//! - Every layer listed in the default `layers` map has an `opacity` entry.
//! - Pins are only created and destroyed through the pin operations on
//!   [`crate::StateStore`].
//! - Opacity values lie in `0..=1` and pin coordinates are finite.
//! - Top-level keys this build does not know are carried through unchanged.

use crate::geo::GeoPoint;
use crate::layer::LayerKind;
use crate::search::ResultEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Camera position above the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub altitude: f64,
    pub lat: f64,
    pub lng: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            altitude: 2.5,
            lat: 20.0,
            lng: 0.0,
        }
    }
}

/// User-placed map annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// `pin-<uuid v7>`; unique for the process lifetime.
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// RFC 3339 UTC timestamp stamped at creation.
    pub timestamp: String,
}

/// Whole reactive state consumed by the globe view.
///
/// Serialized with camelCase keys; this is the persisted and exported shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateTree {
    pub camera: Camera,
    pub layers: BTreeMap<String, bool>,
    pub opacity: BTreeMap<String, f64>,
    pub pins: Vec<Pin>,
    pub selected_pin: Option<String>,
    pub search_results: Vec<ResultEntry>,
    pub is_loading: bool,
    pub current_location: Option<GeoPoint>,
    /// Top-level keys written by a newer build.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StateTree {
    fn default() -> Self {
        let layers = LayerKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), false))
            .collect();
        let opacity = LayerKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), kind.default_opacity()))
            .collect();

        Self {
            camera: Camera::default(),
            layers,
            opacity,
            pins: Vec::new(),
            selected_pin: None,
            search_results: Vec::new(),
            is_loading: false,
            current_location: None,
            extra: Map::new(),
        }
    }
}

impl StateTree {
    /// Whether `layers.<kind>` is set.
    pub fn is_layer_visible(&self, kind: LayerKind) -> bool {
        self.layers.get(kind.as_str()).copied().unwrap_or(false)
    }

    /// `opacity.<kind>`, falling back to the layer's default.
    pub fn layer_opacity(&self, kind: LayerKind) -> f64 {
        self.opacity
            .get(kind.as_str())
            .copied()
            .unwrap_or_else(|| kind.default_opacity())
    }

    /// Checks the value ranges serde cannot express.
    pub(crate) fn check_ranges(&self) -> Result<(), String> {
        if let Some((name, value)) = self
            .opacity
            .iter()
            .find(|(_, value)| !(0.0..=1.0).contains(*value))
        {
            return Err(format!("opacity.{name} must be within 0..=1, got {value}"));
        }
        if let Some(pin) = self
            .pins
            .iter()
            .find(|pin| !pin.lat.is_finite() || !pin.lng.is_finite())
        {
            return Err(format!("pin {} has non-finite coordinates", pin.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StateTree;
    use crate::layer::LayerKind;

    #[test]
    fn default_tree_has_opacity_for_every_layer() {
        let tree = StateTree::default();
        for name in tree.layers.keys() {
            assert!(tree.opacity.contains_key(name), "missing opacity for {name}");
        }
        assert_eq!(tree.layers.len(), LayerKind::ALL.len());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(StateTree::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "camera",
            "layers",
            "opacity",
            "pins",
            "selectedPin",
            "searchResults",
            "isLoading",
            "currentLocation",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn check_ranges_rejects_out_of_range_opacity() {
        let mut tree = StateTree::default();
        assert!(tree.check_ranges().is_ok());

        tree.opacity.insert("flights".to_string(), 1.5);
        let message = tree.check_ranges().unwrap_err();
        assert!(message.contains("opacity.flights"), "{message}");

        tree.opacity.insert("flights".to_string(), f64::NAN);
        assert!(tree.check_ranges().is_err());
    }

    #[test]
    fn unknown_keys_are_kept_on_a_round_trip() {
        let tree: StateTree =
            serde_json::from_str(r#"{"isLoading": true, "terrain": {"scale": 2}}"#).unwrap();
        assert!(tree.is_loading);
        assert_eq!(tree.extra["terrain"]["scale"], 2);

        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["terrain"]["scale"], 2);
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn layer_accessors_fall_back_to_defaults() {
        let mut tree = StateTree::default();
        tree.opacity.clear();
        tree.layers.insert("flights".to_string(), true);

        assert!(tree.is_layer_visible(LayerKind::Flights));
        assert!(!tree.is_layer_visible(LayerKind::Borders));
        assert_eq!(
            tree.layer_opacity(LayerKind::Shipping),
            LayerKind::Shipping.default_opacity()
        );
    }
}
