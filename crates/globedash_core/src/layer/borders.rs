//! Country border polygons loaded from an external boundary source.
//!
//! # Invariants
//! - `apply` never blocks; boundaries arrive through [`LayerPlugin::poll`].
//! - A completion is applied only when its ticket is the one in flight and
//!   the layer is still desired. Anything else is discarded.
//! - A failed fetch leaves no polygons and is not retried until the layer is
//!   removed and applied again.

use crate::geo::GeoPoint;
use crate::layer::{clamp_opacity, GlobeSurface, LayerKind, LayerPlugin, PolygonDatum, Rgba};
use log::{debug, info, warn};
use serde::de::Error as DeError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::{fs, io, thread};

const CAP_COLOR: Rgba = Rgba::rgb(100, 200, 100);
const STROKE_COLOR: Rgba = Rgba::rgb(255, 255, 255);
/// Property keys probed for the country name, in order.
const NAME_PROPERTIES: [&str; 3] = ["ADMIN", "name", "NAME"];
const UNKNOWN_COUNTRY: &str = "Unknown";

pub type FetchResult = Result<Vec<CountryBoundary>, FetchError>;

/// One polygon of a country outline. `rings[0]` is the outer ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBoundary {
    pub name: String,
    pub rings: Vec<Vec<GeoPoint>>,
}

/// Identifies one fetch issued by [`CountryBordersLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub enum FetchError {
    Io(io::Error),
    Malformed(serde_json::Error),
    Unavailable(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "boundary source io error: {err}"),
            Self::Malformed(err) => write!(f, "malformed boundary GeoJSON: {err}"),
            Self::Unavailable(reason) => write!(f, "boundary source unavailable: {reason}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<io::Error> for FetchError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Completion handle passed to a [`BoundaryFetcher`].
///
/// Sendable to a worker thread. Completing after the layer is gone is a
/// no-op.
#[derive(Debug, Clone)]
pub struct FetchCompletion {
    ticket: FetchTicket,
    sender: Sender<(FetchTicket, FetchResult)>,
}

impl FetchCompletion {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub fn complete(self, result: FetchResult) {
        if self.sender.send((self.ticket, result)).is_err() {
            debug!(
                "event=boundary_fetch module=layer status=dropped generation={}",
                self.ticket.generation
            );
        }
    }
}

/// Source of country boundary geometry.
///
/// `fetch` must return promptly and call [`FetchCompletion::complete`]
/// exactly once, on any thread.
pub trait BoundaryFetcher {
    fn fetch(&self, completion: FetchCompletion);
}

/// Reads a GeoJSON FeatureCollection from disk on a worker thread.
#[derive(Debug, Clone)]
pub struct GeoJsonFileFetcher {
    path: PathBuf,
}

impl GeoJsonFileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl BoundaryFetcher for GeoJsonFileFetcher {
    fn fetch(&self, completion: FetchCompletion) {
        let path = self.path.clone();
        let fallback = completion.clone();
        let spawned = thread::Builder::new()
            .name("boundary-fetch".to_string())
            .spawn(move || {
                let result = fs::read_to_string(&path)
                    .map_err(FetchError::from)
                    .and_then(|text| parse_geojson_boundaries(&text));
                completion.complete(result);
            });
        if let Err(err) = spawned {
            fallback.complete(Err(FetchError::Io(err)));
        }
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// Parses Polygon and MultiPolygon features; other geometry is skipped.
///
/// Each polygon of a MultiPolygon becomes its own [`CountryBoundary`].
/// Positions are `[lng, lat, ...]`.
pub fn parse_geojson_boundaries(text: &str) -> FetchResult {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    let mut boundaries = Vec::new();
    for feature in collection.features {
        let polygons = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![coordinates],
            Some(Geometry::MultiPolygon { coordinates }) => coordinates,
            Some(Geometry::Unsupported) | None => continue,
        };
        let name = feature_name(feature.properties.as_ref());
        for polygon in polygons {
            boundaries.push(CountryBoundary {
                name: name.clone(),
                rings: to_rings(&name, polygon)?,
            });
        }
    }
    Ok(boundaries)
}

fn feature_name(properties: Option<&BTreeMap<String, Value>>) -> String {
    properties
        .and_then(|props| {
            NAME_PROPERTIES
                .iter()
                .find_map(|key| props.get(*key).and_then(Value::as_str))
        })
        .unwrap_or(UNKNOWN_COUNTRY)
        .to_string()
}

fn to_rings(name: &str, polygon: Vec<Vec<Vec<f64>>>) -> Result<Vec<Vec<GeoPoint>>, FetchError> {
    polygon
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| match position.as_slice() {
                    [lng, lat, ..] => Ok(GeoPoint::new(*lat, *lng)),
                    _ => Err(FetchError::Malformed(<serde_json::Error as DeError>::custom(
                        format!("position in `{name}` has fewer than two coordinates"),
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

/// Country outlines as filled polygons.
pub struct CountryBordersLayer<'a> {
    fetcher: Box<dyn BoundaryFetcher + 'a>,
    sender: Sender<(FetchTicket, FetchResult)>,
    receiver: Receiver<(FetchTicket, FetchResult)>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    desired: bool,
    failed: bool,
    boundaries: Option<Vec<CountryBoundary>>,
    opacity: f64,
}

impl<'a> CountryBordersLayer<'a> {
    pub fn new(fetcher: impl BoundaryFetcher + 'a) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            fetcher: Box::new(fetcher),
            sender,
            receiver,
            generation: 0,
            in_flight: None,
            desired: false,
            failed: false,
            boundaries: None,
            opacity: LayerKind::Borders.default_opacity(),
        }
    }

    /// A fetch has been issued and not yet polled.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Boundaries from the last successful fetch.
    pub fn cached_boundaries(&self) -> Option<&[CountryBoundary]> {
        self.boundaries.as_deref()
    }

    fn start_fetch(&mut self) {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        info!(
            "event=boundary_fetch module=layer status=start generation={}",
            ticket.generation
        );
        self.fetcher.fetch(FetchCompletion {
            ticket,
            sender: self.sender.clone(),
        });
    }

    fn push_polygons(&self, surface: &mut dyn GlobeSurface) {
        let Some(boundaries) = &self.boundaries else {
            return;
        };
        let cap_color = CAP_COLOR.with_alpha(self.opacity * 0.5);
        let stroke_color = STROKE_COLOR.with_alpha(self.opacity);
        surface.set_polygons(
            boundaries
                .iter()
                .map(|boundary| PolygonDatum {
                    name: boundary.name.clone(),
                    rings: boundary.rings.clone(),
                    cap_color,
                    stroke_color,
                })
                .collect(),
        );
    }

    fn handle_completion(
        &mut self,
        surface: &mut dyn GlobeSurface,
        ticket: FetchTicket,
        result: FetchResult,
    ) {
        if self.in_flight != Some(ticket) {
            debug!(
                "event=boundary_fetch module=layer status=stale generation={}",
                ticket.generation
            );
            return;
        }
        self.in_flight = None;

        match result {
            Ok(boundaries) => {
                info!(
                    "event=boundary_fetch module=layer status=ok generation={} polygons={}",
                    ticket.generation,
                    boundaries.len()
                );
                self.boundaries = Some(boundaries);
                if self.desired {
                    self.push_polygons(surface);
                }
            }
            Err(err) => {
                warn!(
                    "event=boundary_fetch module=layer status=error generation={} error={}",
                    ticket.generation, err
                );
                self.failed = true;
            }
        }
    }
}

impl LayerPlugin for CountryBordersLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Borders
    }

    fn apply(&mut self, surface: &mut dyn GlobeSurface, opacity: f64) {
        self.opacity = clamp_opacity(opacity);
        self.desired = true;
        if self.boundaries.is_some() {
            self.push_polygons(surface);
        } else if self.in_flight.is_none() && !self.failed {
            self.start_fetch();
        }
    }

    fn remove(&mut self, surface: &mut dyn GlobeSurface) {
        self.desired = false;
        self.failed = false;
        // Invalidate whatever is still in flight.
        self.generation += 1;
        self.in_flight = None;
        surface.set_polygons(Vec::new());
    }

    fn is_pending(&self) -> bool {
        self.is_loading()
    }

    fn poll(&mut self, surface: &mut dyn GlobeSurface) {
        loop {
            match self.receiver.try_recv() {
                Ok((ticket, result)) => self.handle_completion(surface, ticket, result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}
