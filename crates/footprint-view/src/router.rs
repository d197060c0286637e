use crate::compositor::RenderLayer;
use footprint_core::models::Position;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Screen offset of the tooltip from the pointer, in pixels
pub const TOOLTIP_OFFSET_PX: f64 = 10.0;

/// Pointer position over the overlay.
///
/// `coordinate` is the geographic position the overlay renderer resolved for `x, y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub coordinate: Position,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, coordinate: Position) -> Self {
        Self { x, y, coordinate }
    }
}

/// Feature under the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub layer_id: &'static str,
    /// Index of the feature within its layer's data
    pub index: usize,
    pub properties: Map<String, JsonValue>,
    pub x: f64,
    pub y: f64,
}

/// Resolves pointer events to at most one feature
#[derive(Debug, Default)]
pub struct InteractionRouter {
    current: Option<Pick>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the topmost feature under the pointer.
    ///
    /// Pickable layers are searched from the top of the list down; within a layer the
    /// later feature wins. A miss clears the current pick.
    pub fn hover(&mut self, event: PointerEvent, layers: &[RenderLayer]) -> Option<&Pick> {
        self.current = layers.iter().rev().filter(|layer| layer.style.pickable).find_map(|layer| {
            layer.data.feature_at(event.coordinate).map(|(index, properties)| Pick {
                layer_id: layer.id,
                index,
                properties,
                x: event.x,
                y: event.y,
            })
        });
        self.current.as_ref()
    }

    /// Pointer left the overlay
    pub fn leave(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Pick> {
        self.current.as_ref()
    }
}

/// Hover card content for a picked building
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    pub fn from_pick(pick: &Pick) -> Self {
        let props = &pick.properties;

        let title = props
            .get("primary_name")
            .and_then(JsonValue::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or("Building")
            .to_string();

        let mut lines = Vec::new();
        // Zero heights and empty classes are not shown
        if let Some(height) = props.get("height").and_then(JsonValue::as_f64).filter(|h| *h != 0.0) {
            lines.push(format!("Height: {}m", height));
        }
        if let Some(class) = props.get("class").and_then(JsonValue::as_str).filter(|c| !c.is_empty()) {
            lines.push(format!("Class: {}", class));
        }

        Self { title, lines, x: pick.x + TOOLTIP_OFFSET_PX, y: pick.y + TOOLTIP_OFFSET_PX }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DatasetCache;
    use crate::compositor::{compose_layers, BUILDINGS_LAYER_ID};
    use footprint_core::models::{
        AreaCollection, AreaFeature, AreaSource, BuildingCollection, BuildingFeature,
        BuildingProperties, BuildingQuery, Geometry,
    };
    use std::sync::Arc;

    fn square(x: f64, y: f64, size: f64) -> Geometry {
        Geometry::polygon(vec![vec![
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y],
        ]])
    }

    fn layers() -> Vec<RenderLayer> {
        let buildings = vec![
            BuildingFeature {
                id: "big".into(),
                geometry: square(0.0, 0.0, 4.0),
                properties: BuildingProperties {
                    primary_name: Some("Mall".into()),
                    ..Default::default()
                },
            },
            BuildingFeature {
                id: "small".into(),
                geometry: square(1.0, 1.0, 1.0),
                properties: BuildingProperties {
                    height: Some(12.5),
                    class: Some("residential".into()),
                    ..Default::default()
                },
            },
        ];

        let mut cache = DatasetCache::new();
        let ticket = cache.begin_fetch(BuildingQuery::new(square(0.0, 0.0, 10.0)));
        cache
            .complete(&ticket, Ok(BuildingCollection { features: buildings, ..Default::default() }))
            .unwrap();

        let area = Arc::new(AreaCollection::new(vec![AreaFeature::new(
            "Area",
            square(0.0, 0.0, 10.0),
            AreaSource::Upload,
        )]));
        compose_layers(Some(&area), cache.current().as_ref(), 0.6, None)
    }

    #[test]
    fn test_later_feature_wins() {
        let layers = layers();
        let mut router = InteractionRouter::new();

        let pick = router.hover(PointerEvent::new(100.0, 50.0, [1.5, 1.5]), &layers).unwrap();
        assert_eq!(pick.layer_id, BUILDINGS_LAYER_ID);
        assert_eq!(pick.index, 1);
        assert_eq!(pick.x, 100.0);

        let pick = router.hover(PointerEvent::new(0.0, 0.0, [3.5, 3.5]), &layers).unwrap();
        assert_eq!(pick.index, 0);
    }

    #[test]
    fn test_non_pickable_layers_are_skipped() {
        let layers = layers();
        let mut router = InteractionRouter::new();

        // Inside the area layer but outside every building
        assert!(router.hover(PointerEvent::new(0.0, 0.0, [8.0, 8.0]), &layers).is_none());
        assert!(router.current().is_none());
    }

    #[test]
    fn test_miss_and_leave_clear_pick() {
        let layers = layers();
        let mut router = InteractionRouter::new();

        router.hover(PointerEvent::new(0.0, 0.0, [1.5, 1.5]), &layers);
        assert!(router.current().is_some());
        router.hover(PointerEvent::new(0.0, 0.0, [50.0, 50.0]), &layers);
        assert!(router.current().is_none());

        router.hover(PointerEvent::new(0.0, 0.0, [1.5, 1.5]), &layers);
        router.leave();
        assert!(router.current().is_none());
    }

    #[test]
    fn test_tooltip_content() {
        let layers = layers();
        let mut router = InteractionRouter::new();

        let pick = router.hover(PointerEvent::new(200.0, 120.0, [1.5, 1.5]), &layers).unwrap();
        let tooltip = Tooltip::from_pick(pick);
        assert_eq!(tooltip.title, "Building");
        assert_eq!(tooltip.lines, vec!["Height: 12.5m", "Class: residential"]);
        assert_eq!((tooltip.x, tooltip.y), (210.0, 130.0));

        let pick = router.hover(PointerEvent::new(0.0, 0.0, [3.5, 3.5]), &layers).unwrap();
        let tooltip = Tooltip::from_pick(pick);
        assert_eq!(tooltip.title, "Mall");
        assert!(tooltip.lines.is_empty());
    }

    #[test]
    fn test_whole_heights_print_without_fraction() {
        let mut properties = Map::new();
        properties.insert("height".into(), serde_json::json!(12.0));
        let pick = Pick { layer_id: BUILDINGS_LAYER_ID, index: 0, properties, x: 0.0, y: 0.0 };
        assert_eq!(Tooltip::from_pick(&pick).lines, vec!["Height: 12m"]);
    }
}
