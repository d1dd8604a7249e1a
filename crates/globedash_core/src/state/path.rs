//! Typed addresses into the state tree.

use crate::state::StateError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Bulk-notification path used by reset and import.
pub const WILDCARD_PATH: &str = "*";

/// One addressable location in [`crate::StateTree`].
///
/// The dotted string form (`opacity.flights`) is accepted through [`FromStr`]
/// and produced by [`Display`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatePath {
    Camera,
    CameraAltitude,
    CameraLat,
    CameraLng,
    Layers,
    Layer(String),
    Opacity,
    LayerOpacity(String),
    Pins,
    SelectedPin,
    SearchResults,
    IsLoading,
    CurrentLocation,
    /// The whole tree; only used for notifications.
    All,
}

impl StatePath {
    pub fn layer(name: impl Into<String>) -> Self {
        Self::Layer(name.into())
    }

    pub fn opacity(name: impl Into<String>) -> Self {
        Self::LayerOpacity(name.into())
    }

    /// Serialized key segments from the root. Empty for [`StatePath::All`].
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Camera => vec!["camera"],
            Self::CameraAltitude => vec!["camera", "altitude"],
            Self::CameraLat => vec!["camera", "lat"],
            Self::CameraLng => vec!["camera", "lng"],
            Self::Layers => vec!["layers"],
            Self::Layer(name) => vec!["layers", name.as_str()],
            Self::Opacity => vec!["opacity"],
            Self::LayerOpacity(name) => vec!["opacity", name.as_str()],
            Self::Pins => vec!["pins"],
            Self::SelectedPin => vec!["selectedPin"],
            Self::SearchResults => vec!["searchResults"],
            Self::IsLoading => vec!["isLoading"],
            Self::CurrentLocation => vec!["currentLocation"],
            Self::All => Vec::new(),
        }
    }
}

impl Display for StatePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if matches!(self, Self::All) {
            return f.write_str(WILDCARD_PATH);
        }
        f.write_str(&self.segments().join("."))
    }
}

impl FromStr for StatePath {
    type Err = StateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || StateError::UnknownPath(raw.to_string());
        let trimmed = raw.trim();
        if trimmed == WILDCARD_PATH {
            return Ok(Self::All);
        }

        let segments: Vec<&str> = trimmed.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(unknown());
        }

        let path = match segments.as_slice() {
            ["camera"] => Self::Camera,
            ["camera", "altitude"] => Self::CameraAltitude,
            ["camera", "lat"] => Self::CameraLat,
            ["camera", "lng"] => Self::CameraLng,
            ["layers"] => Self::Layers,
            ["layers", name] => Self::Layer((*name).to_string()),
            ["opacity"] => Self::Opacity,
            ["opacity", name] => Self::LayerOpacity((*name).to_string()),
            ["pins"] => Self::Pins,
            ["selectedPin"] => Self::SelectedPin,
            ["searchResults"] => Self::SearchResults,
            ["isLoading"] => Self::IsLoading,
            ["currentLocation"] => Self::CurrentLocation,
            _ => return Err(unknown()),
        };
        Ok(path)
    }
}
