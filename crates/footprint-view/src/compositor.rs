//! Ordered render layers and their styling.
//!
//! Layers are rebuilt, never mutated. List order is paint order and pick priority: the
//! last layer is drawn on top and picked first.

use crate::cache::Dataset;
use crate::draw::Sketch;
use footprint_core::models::{AreaCollection, Position};
use footprint_geo::GeometryExt;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// RGBA colour, 0-255 per channel
pub type Rgba = [u8; 4];

pub const AREA_LAYER_ID: &str = "area-selection";
pub const BUILDINGS_LAYER_ID: &str = "buildings";
pub const DRAW_LAYER_ID: &str = "draw-layer";

const BUILDING_RGB: [u8; 3] = [255, 120, 0];
const BUILDING_HIGHLIGHT: Rgba = [255, 200, 0, 180];

/// Style of the selected areas; opacity does not apply
pub const AREA_STYLE: LayerStyle = LayerStyle {
    fill: [51, 136, 255, 50],
    line: [51, 136, 255, 200],
    line_width_px: 2.0,
    pickable: false,
    highlight: None,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub fill: Rgba,
    pub line: Rgba,
    /// Line width in screen pixels
    pub line_width_px: f64,
    pub pickable: bool,
    /// Colour of the hovered feature, when hover highlighting is enabled
    pub highlight: Option<Rgba>,
}

impl LayerStyle {
    /// Building style at `opacity`, clamped to `[0, 1]`
    pub fn buildings(opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let [r, g, b] = BUILDING_RGB;
        Self {
            fill: [r, g, b, alpha(opacity, 100.0)],
            line: [r, g, b, alpha(opacity, 255.0)],
            line_width_px: 1.0,
            pickable: true,
            highlight: Some(BUILDING_HIGHLIGHT),
        }
    }
}

fn alpha(opacity: f64, scale: f64) -> u8 {
    // NaN saturates to 0
    (opacity * scale).round() as u8
}

/// Shared data behind a layer
#[derive(Debug, Clone)]
pub enum LayerData {
    Areas(Arc<AreaCollection>),
    Buildings(Arc<Dataset>),
    Sketch(Arc<Sketch>),
}

impl LayerData {
    /// Pointer identity of the underlying data
    pub fn same_as(&self, other: &LayerData) -> bool {
        match (self, other) {
            (LayerData::Areas(a), LayerData::Areas(b)) => Arc::ptr_eq(a, b),
            (LayerData::Buildings(a), LayerData::Buildings(b)) => Arc::ptr_eq(a, b),
            (LayerData::Sketch(a), LayerData::Sketch(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn feature_count(&self) -> usize {
        match self {
            LayerData::Areas(areas) => areas.len(),
            LayerData::Buildings(dataset) => dataset.len(),
            LayerData::Sketch(sketch) => usize::from(sketch.preview().is_some()),
        }
    }

    /// Topmost feature containing `position`, with its properties
    pub fn feature_at(&self, position: Position) -> Option<(usize, Map<String, JsonValue>)> {
        match self {
            LayerData::Buildings(dataset) => {
                let index = dataset.index.topmost_at(position)?;
                let properties = match serde_json::to_value(&dataset.features[index].properties) {
                    Ok(JsonValue::Object(map)) => map,
                    _ => Map::new(),
                };
                Some((index, properties))
            }
            LayerData::Areas(areas) => areas
                .features
                .iter()
                .enumerate()
                .rev()
                .find(|(_, area)| area.geometry.contains_position(position))
                .map(|(index, area)| {
                    let mut properties = area.properties.clone();
                    properties.insert("name".to_string(), JsonValue::String(area.name.clone()));
                    (index, properties)
                }),
            LayerData::Sketch(_) => None,
        }
    }
}

/// One entry of the render pass
#[derive(Debug, Clone)]
pub struct RenderLayer {
    /// Stable across rebuilds, so renderers can diff by id
    pub id: &'static str,
    pub data: LayerData,
    pub style: LayerStyle,
}

impl RenderLayer {
    pub fn area_selection(areas: Arc<AreaCollection>) -> Self {
        Self { id: AREA_LAYER_ID, data: LayerData::Areas(areas), style: AREA_STYLE }
    }

    pub fn buildings(dataset: Arc<Dataset>, opacity: f64) -> Self {
        Self {
            id: BUILDINGS_LAYER_ID,
            data: LayerData::Buildings(dataset),
            style: LayerStyle::buildings(opacity),
        }
    }
}

/// Build the ordered layer list: areas, then buildings, then the drawing on top
pub fn compose_layers(
    area: Option<&Arc<AreaCollection>>,
    buildings: Option<&Arc<Dataset>>,
    opacity: f64,
    draw: Option<&RenderLayer>,
) -> Vec<RenderLayer> {
    let mut layers = Vec::with_capacity(3);
    if let Some(area) = area {
        layers.push(RenderLayer::area_selection(Arc::clone(area)));
    }
    if let Some(dataset) = buildings {
        layers.push(RenderLayer::buildings(Arc::clone(dataset), opacity));
    }
    if let Some(draw) = draw {
        layers.push(draw.clone());
    }
    layers
}

/// Inputs of the last composition, held to compare by identity
#[derive(Debug)]
struct Composed {
    area: Option<Arc<AreaCollection>>,
    buildings: Option<Arc<Dataset>>,
    opacity_bits: u64,
    draw: Option<LayerData>,
    layers: Arc<Vec<RenderLayer>>,
}

impl Composed {
    fn matches(
        &self,
        area: Option<&Arc<AreaCollection>>,
        buildings: Option<&Arc<Dataset>>,
        opacity: f64,
        draw: Option<&RenderLayer>,
    ) -> bool {
        same_arc(self.area.as_ref(), area)
            && same_arc(self.buildings.as_ref(), buildings)
            && self.opacity_bits == opacity.to_bits()
            && match (&self.draw, draw) {
                (None, None) => true,
                (Some(a), Some(b)) => a.same_as(&b.data),
                _ => false,
            }
    }
}

fn same_arc<T>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Memoised `compose_layers`.
///
/// Returns the same shared list while every input is identical.
#[derive(Debug, Default)]
pub struct LayerCompositor {
    last: Option<Composed>,
    rebuilds: usize,
}

impl LayerCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(
        &mut self,
        area: Option<&Arc<AreaCollection>>,
        buildings: Option<&Arc<Dataset>>,
        opacity: f64,
        draw: Option<&RenderLayer>,
    ) -> Arc<Vec<RenderLayer>> {
        if let Some(last) = &self.last {
            if last.matches(area, buildings, opacity, draw) {
                return Arc::clone(&last.layers);
            }
        }

        let layers = Arc::new(compose_layers(area, buildings, opacity, draw));
        self.rebuilds += 1;
        tracing::trace!(layers = layers.len(), rebuilds = self.rebuilds, "Recomposed layers");

        self.last = Some(Composed {
            area: area.cloned(),
            buildings: buildings.cloned(),
            opacity_bits: opacity.to_bits(),
            draw: draw.map(|layer| layer.data.clone()),
            layers: Arc::clone(&layers),
        });
        layers
    }

    /// Number of times the layer list was rebuilt
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DatasetCache;
    use crate::draw::{DrawMode, DrawSession};
    use footprint_core::models::{
        AreaFeature, AreaSource, BuildingCollection, BuildingQuery, Geometry,
    };

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]])
    }

    fn area() -> Arc<AreaCollection> {
        Arc::new(AreaCollection::new(vec![AreaFeature::new("A", square(), AreaSource::Upload)]))
    }

    fn dataset() -> Arc<Dataset> {
        let mut cache = DatasetCache::new();
        let ticket = cache.begin_fetch(BuildingQuery::new(square()));
        cache.complete(&ticket, Ok(BuildingCollection::default())).unwrap();
        cache.current().unwrap()
    }

    #[test]
    fn test_opacity_scaling() {
        let style = LayerStyle::buildings(0.6);
        assert_eq!(style.fill, [255, 120, 0, 60]);
        assert_eq!(style.line, [255, 120, 0, 153]);

        let style = LayerStyle::buildings(1.0);
        assert_eq!(style.fill[3], 100);
        assert_eq!(style.line[3], 255);
    }

    #[test]
    fn test_opacity_is_clamped() {
        assert_eq!(LayerStyle::buildings(3.0).line[3], 255);
        assert_eq!(LayerStyle::buildings(-1.0).fill[3], 0);
    }

    #[test]
    fn test_layer_order() {
        let mut draw = DrawSession::new();
        draw.start(DrawMode::Polygon);
        let draw_layer = draw.draw_layer();

        let layers = compose_layers(Some(&area()), Some(&dataset()), 0.6, draw_layer.as_ref());
        let ids: Vec<_> = layers.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![AREA_LAYER_ID, BUILDINGS_LAYER_ID, DRAW_LAYER_ID]);

        assert!(!layers[0].style.pickable);
        assert!(layers[1].style.pickable);
        assert_eq!(layers[1].style.highlight, Some([255, 200, 0, 180]));
    }

    #[test]
    fn test_absent_inputs_are_skipped() {
        assert!(compose_layers(None, None, 0.6, None).is_empty());
        let layers = compose_layers(None, Some(&dataset()), 0.6, None);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, BUILDINGS_LAYER_ID);
    }

    #[test]
    fn test_memoised_while_inputs_identical() {
        let mut compositor = LayerCompositor::new();
        let area = area();
        let dataset = dataset();

        let first = compositor.compose(Some(&area), Some(&dataset), 0.6, None);
        let second = compositor.compose(Some(&area), Some(&dataset), 0.6, None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(compositor.rebuilds(), 1);

        let third = compositor.compose(Some(&area), Some(&dataset), 0.7, None);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third[1].id, first[1].id);

        // Equal content behind a new allocation is a new input
        let copy = Arc::new((*area).clone());
        let fourth = compositor.compose(Some(&copy), Some(&dataset), 0.7, None);
        assert!(!Arc::ptr_eq(&third, &fourth));
        assert_eq!(compositor.rebuilds(), 3);
    }

    #[test]
    fn test_area_pick_prefers_later_feature() {
        let areas = AreaCollection::new(vec![
            AreaFeature::new("Outer", square(), AreaSource::Upload),
            AreaFeature::new("Inner", square(), AreaSource::Upload),
        ]);
        let data = LayerData::Areas(Arc::new(areas));

        let (index, properties) = data.feature_at([0.5, 0.5]).unwrap();
        assert_eq!(index, 1);
        assert_eq!(properties["name"], "Inner");
        assert!(data.feature_at([5.0, 5.0]).is_none());
    }
}
