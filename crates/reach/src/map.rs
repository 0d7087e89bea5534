//! Map collaborator.
//!
//! The application only talks to [`MapSurface`]. [`GeoJsonMap`] is the
//! bundled implementation: it tracks the viewport the way a slippy map would
//! and exports the current scene as a GeoJSON `FeatureCollection`.

use std::fmt;

use geo::{Destination as _, Haversine, Point, Rect, coord};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::reachability::CircleOverlay;

pub const MAX_ZOOM: u8 = 19;
const TILE_SIZE: f64 = 256.0;
const CIRCLE_VERTICES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Uuid);

impl LayerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

pub trait MapSurface {
    fn set_view(&mut self, center: Point<f64>, zoom: u8);

    fn add_marker(&mut self, position: Point<f64>, label: &str) -> LayerId;

    fn add_circle(&mut self, circle: &CircleOverlay) -> LayerId;

    fn remove_layer(&mut self, id: LayerId);

    /// Currently visible area, `None` before the first `set_view`.
    fn bounds(&self) -> Option<Rect<f64>>;

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding_px: u32);
}

/// Bounding box of a circle on the sphere.
pub fn circle_bounds(circle: &CircleOverlay) -> Rect<f64> {
    let at = |bearing: f64| Haversine.destination(circle.center, bearing, circle.radius_meters);
    let (north, east, south, west) = (at(0.0), at(90.0), at(180.0), at(270.0));
    Rect::new(
        coord! { x: west.x(), y: south.y() },
        coord! { x: east.x(), y: north.y() },
    )
}

pub fn rect_contains(outer: &Rect<f64>, inner: &Rect<f64>) -> bool {
    outer.min().x <= inner.min().x
        && outer.min().y <= inner.min().y
        && outer.max().x >= inner.max().x
        && outer.max().y >= inner.max().y
}

#[derive(Debug, Clone)]
enum Layer {
    Marker { position: Point<f64>, label: String },
    Circle(CircleOverlay),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct View {
    center: Point<f64>,
    zoom: u8,
}

#[derive(Debug, Clone)]
pub struct GeoJsonMap {
    width_px: u32,
    height_px: u32,
    view: Option<View>,
    layers: Vec<(LayerId, Layer)>,
}

impl GeoJsonMap {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
            view: None,
            layers: Vec::new(),
        }
    }

    pub fn zoom(&self) -> Option<u8> {
        self.view.map(|v| v.zoom)
    }

    pub fn circles(&self) -> impl Iterator<Item = &CircleOverlay> {
        self.layers.iter().filter_map(|(_, layer)| match layer {
            Layer::Circle(circle) => Some(circle),
            Layer::Marker { .. } => None,
        })
    }

    pub fn marker_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|(_, layer)| matches!(layer, Layer::Marker { .. }))
            .count()
    }

    /// Degrees of longitude covered by one pixel at `zoom`.
    fn degrees_per_pixel(zoom: u8) -> f64 {
        360.0 / (TILE_SIZE * 2f64.powi(i32::from(zoom)))
    }

    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .layers
            .iter()
            .map(|(id, layer)| match layer {
                Layer::Marker { position, label } => json!({
                    "type": "Feature",
                    "id": id.to_string(),
                    "geometry": {
                        "type": "Point",
                        "coordinates": [position.x(), position.y()],
                    },
                    "properties": { "kind": "marker", "label": label },
                }),
                Layer::Circle(circle) => json!({
                    "type": "Feature",
                    "id": id.to_string(),
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [circle_ring(circle)],
                    },
                    "properties": {
                        "kind": "reachable_area",
                        "radius_m": circle.radius_meters,
                        "style": circle.style,
                    },
                }),
            })
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some(bounds) = self.bounds() {
            collection["bbox"] = json!([
                bounds.min().x,
                bounds.min().y,
                bounds.max().x,
                bounds.max().y
            ]);
        }
        collection
    }
}

/// Closed ring of `[lng, lat]` pairs approximating the circle.
fn circle_ring(circle: &CircleOverlay) -> Vec<[f64; 2]> {
    (0..=CIRCLE_VERTICES)
        .map(|i| {
            let bearing = 360.0 * (i % CIRCLE_VERTICES) as f64 / CIRCLE_VERTICES as f64;
            let p = Haversine.destination(circle.center, bearing, circle.radius_meters);
            [p.x(), p.y()]
        })
        .collect()
}

impl MapSurface for GeoJsonMap {
    fn set_view(&mut self, center: Point<f64>, zoom: u8) {
        self.view = Some(View {
            center,
            zoom: zoom.min(MAX_ZOOM),
        });
    }

    fn add_marker(&mut self, position: Point<f64>, label: &str) -> LayerId {
        let id = LayerId::new();
        self.layers.push((
            id,
            Layer::Marker {
                position,
                label: label.to_string(),
            },
        ));
        id
    }

    fn add_circle(&mut self, circle: &CircleOverlay) -> LayerId {
        let id = LayerId::new();
        self.layers.push((id, Layer::Circle(circle.clone())));
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|(layer_id, _)| *layer_id != id);
    }

    fn bounds(&self) -> Option<Rect<f64>> {
        let view = self.view?;
        let dpp = Self::degrees_per_pixel(view.zoom);
        let half_lng = f64::from(self.width_px) * dpp / 2.0;
        let half_lat = f64::from(self.height_px) * dpp * view.center.y().to_radians().cos() / 2.0;
        Some(Rect::new(
            coord! { x: view.center.x() - half_lng, y: view.center.y() - half_lat },
            coord! { x: view.center.x() + half_lng, y: view.center.y() + half_lat },
        ))
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding_px: u32) {
        let center = Point::from(bounds.center());
        let usable_w = f64::from(self.width_px.saturating_sub(2 * padding_px).max(1));
        let usable_h = f64::from(self.height_px.saturating_sub(2 * padding_px).max(1));
        let cos_lat = center.y().to_radians().cos();

        // Highest zoom at which the padded bounds still fit on both axes.
        let zoom = (0..=MAX_ZOOM)
            .rev()
            .find(|z| {
                let dpp = Self::degrees_per_pixel(*z);
                bounds.width() <= usable_w * dpp && bounds.height() <= usable_h * dpp * cos_lat
            })
            .unwrap_or(0);

        tracing::debug!(zoom, "Fitting map to bounds");
        self.set_view(center, zoom);
    }
}
