//! Pin lifecycle on top of [`StateStore`].
//!
//! # Invariants
//! - Pin ids are `pin-<uuid v7>` and never reused within a process.
//! - `pins` order is insertion order, which is also display order.
//! - `selectedPin` never names a removed pin.
//! - Pin coordinates are finite; anything else never reaches the tree.

use crate::state::{Pin, StateError, StatePath, StateResult, StateStore};
use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use uuid::Uuid;

/// Caller-provided fields for [`StateStore::add_pin`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPin {
    pub lat: f64,
    pub lng: f64,
    pub label: Option<String>,
}

impl NewPin {
    pub fn at(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl StateStore {
    /// Appends a new pin with generated id and timestamp.
    ///
    /// # Errors
    /// - [`StateError::InvalidValue`] when `lat` or `lng` is NaN or infinite.
    pub fn add_pin(&mut self, fields: NewPin) -> StateResult<Pin> {
        if !fields.lat.is_finite() || !fields.lng.is_finite() {
            warn!(
                "event=pin_add module=state status=rejected error_code=non_finite_coordinates lat={} lng={}",
                fields.lat, fields.lng
            );
            return Err(StateError::InvalidValue {
                path: StatePath::Pins,
                message: format!(
                    "pin coordinates must be finite, got lat={} lng={}",
                    fields.lat, fields.lng
                ),
            });
        }

        let pin = Pin {
            id: format!("pin-{}", Uuid::now_v7()),
            lat: fields.lat,
            lng: fields.lng,
            label: fields.label,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.tree.pins.push(pin.clone());
        self.commit(StatePath::Pins);
        info!(
            "event=pin_add module=state status=ok pin_id={} pin_count={}",
            pin.id,
            self.tree.pins.len()
        );
        Ok(pin)
    }

    /// Removes the pin with `id`; absent ids are ignored.
    pub fn remove_pin(&mut self, id: &str) {
        let Some(index) = self.tree.pins.iter().position(|pin| pin.id == id) else {
            debug!("event=pin_remove module=state status=noop pin_id={id}");
            return;
        };

        self.tree.pins.remove(index);
        let was_selected = self.tree.selected_pin.as_deref() == Some(id);
        if was_selected {
            self.tree.selected_pin = None;
        }

        self.commit(StatePath::Pins);
        if was_selected {
            self.commit(StatePath::SelectedPin);
        }
        info!("event=pin_remove module=state status=ok pin_id={id}");
    }

    pub fn get_pin(&self, id: &str) -> Option<&Pin> {
        self.tree.pins.iter().find(|pin| pin.id == id)
    }

    pub fn pins(&self) -> &[Pin] {
        &self.tree.pins
    }

    /// Selects an existing pin, or clears the selection with `None`.
    ///
    /// Returns `false` without mutating when `id` names no pin.
    pub fn select_pin(&mut self, id: Option<&str>) -> bool {
        if let Some(id) = id {
            if self.get_pin(id).is_none() {
                return false;
            }
        }
        self.tree.selected_pin = id.map(str::to_string);
        self.commit(StatePath::SelectedPin);
        true
    }
}
