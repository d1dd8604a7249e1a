//! Boundary to the rendering engine.
//!
//! The engine owns the globe; layers only replace whole collections through
//! these setters. Each collection kind is owned by exactly one layer.

use crate::geo::GeoPoint;
use crate::layer::Rgba;
use serde::Serialize;

/// Great-circle arc between two points (flights).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcDatum {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Gradient from `start` to `end`.
    pub colors: [Rgba; 2],
    pub label: String,
}

/// Polyline over the surface (shipping lanes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDatum {
    pub points: Vec<GeoPoint>,
    pub color: Rgba,
    pub label: String,
}

/// Text anchored at a point (ocean names).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDatum {
    pub position: GeoPoint,
    pub text: String,
    pub size: f64,
    pub color: Rgba,
}

/// Filled outline (country borders). `rings[0]` is the outer ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonDatum {
    pub name: String,
    pub rings: Vec<Vec<GeoPoint>>,
    pub cap_color: Rgba,
    pub stroke_color: Rgba,
}

/// Opaque rendering target shared by all layers.
pub trait GlobeSurface {
    fn set_arcs(&mut self, arcs: Vec<ArcDatum>);
    fn arcs(&self) -> &[ArcDatum];
    fn set_paths(&mut self, paths: Vec<PathDatum>);
    fn paths(&self) -> &[PathDatum];
    fn set_labels(&mut self, labels: Vec<LabelDatum>);
    fn labels(&self) -> &[LabelDatum];
    fn set_polygons(&mut self, polygons: Vec<PolygonDatum>);
    fn polygons(&self) -> &[PolygonDatum];
}

/// Surface that only records the collections it was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemorySurface {
    arcs: Vec<ArcDatum>,
    paths: Vec<PathDatum>,
    labels: Vec<LabelDatum>,
    polygons: Vec<PolygonDatum>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GlobeSurface for InMemorySurface {
    fn set_arcs(&mut self, arcs: Vec<ArcDatum>) {
        self.arcs = arcs;
    }

    fn arcs(&self) -> &[ArcDatum] {
        &self.arcs
    }

    fn set_paths(&mut self, paths: Vec<PathDatum>) {
        self.paths = paths;
    }

    fn paths(&self) -> &[PathDatum] {
        &self.paths
    }

    fn set_labels(&mut self, labels: Vec<LabelDatum>) {
        self.labels = labels;
    }

    fn labels(&self) -> &[LabelDatum] {
        &self.labels
    }

    fn set_polygons(&mut self, polygons: Vec<PolygonDatum>) {
        self.polygons = polygons;
    }

    fn polygons(&self) -> &[PolygonDatum] {
        &self.polygons
    }
}
