use crate::compositor::{LayerData, LayerStyle, RenderLayer, DRAW_LAYER_ID};
use footprint_core::error::{FootprintError, Result};
use footprint_core::models::{AreaFeature, AreaSource, Geometry, Position};
use footprint_geo::shapes::{polygon_from_vertices, rectangle_from_corners};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Interaction mode of the draw tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    #[default]
    View,
    Polygon,
    Rectangle,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::View => write!(f, "view"),
            DrawMode::Polygon => write!(f, "polygon"),
            DrawMode::Rectangle => write!(f, "rectangle"),
        }
    }
}

/// Style of the in-progress drawing, painted above everything else
pub const DRAW_STYLE: LayerStyle = LayerStyle {
    fill: [255, 165, 0, 40],
    line: [255, 165, 0, 255],
    line_width_px: 2.0,
    pickable: false,
    highlight: None,
};

/// In-progress drawing as handed to the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    pub mode: DrawMode,
    pub vertices: Vec<Position>,
}

impl Sketch {
    /// Shape the vertices would produce if completed now
    pub fn preview(&self) -> Option<Geometry> {
        match self.mode {
            DrawMode::View => None,
            DrawMode::Polygon => polygon_from_vertices(&self.vertices),
            DrawMode::Rectangle => rectangle_corners(&self.vertices)
                .and_then(|(first, last)| rectangle_from_corners(first, last)),
        }
    }
}

fn rectangle_corners(vertices: &[Position]) -> Option<(Position, Position)> {
    match vertices {
        [first, .., last] => Some((*first, *last)),
        _ => None,
    }
}

/// Polygon and rectangle drawing state machine.
///
/// `View --start--> Polygon|Rectangle --complete|cancel--> View`
#[derive(Debug, Default)]
pub struct DrawSession {
    sketch: Arc<Sketch>,
    completed: usize,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawMode {
        self.sketch.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.sketch.mode != DrawMode::View
    }

    pub fn vertices(&self) -> &[Position] {
        &self.sketch.vertices
    }

    /// Enter `mode`, discarding any pending vertices. Starting `View` cancels.
    pub fn start(&mut self, mode: DrawMode) {
        if !self.sketch.vertices.is_empty() {
            tracing::debug!(discarded = self.sketch.vertices.len(), "Discarding pending drawing");
        }
        self.sketch = Arc::new(Sketch { mode, vertices: Vec::new() });
        tracing::debug!(%mode, "Draw mode changed");
    }

    /// Record a vertex of the current drawing
    pub fn add_vertex(&mut self, longitude: f64, latitude: f64) -> Result<()> {
        if !self.is_drawing() {
            return Err(FootprintError::NoActiveDraw);
        }
        let mut vertices = self.sketch.vertices.clone();
        vertices.push([longitude, latitude]);
        self.sketch = Arc::new(Sketch { mode: self.sketch.mode, vertices });
        Ok(())
    }

    /// Leave the draw mode without emitting anything
    pub fn cancel(&mut self) {
        if self.is_drawing() {
            self.start(DrawMode::View);
        }
    }

    /// Finish the drawing and emit it as an area.
    ///
    /// An incomplete shape keeps the session in its draw mode so more vertices can be added.
    pub fn complete(&mut self) -> Result<AreaFeature> {
        let mode = self.mode();
        let geometry = match mode {
            DrawMode::View => return Err(FootprintError::NoActiveDraw),
            DrawMode::Polygon => self.sketch.preview().ok_or_else(|| {
                let recorded = self.vertices().len();
                incomplete(
                    mode,
                    format!("a polygon needs at least 3 distinct vertices, {} recorded", recorded),
                )
            })?,
            DrawMode::Rectangle => self.sketch.preview().ok_or_else(|| {
                incomplete(mode, "a rectangle needs two distinct opposite corners".to_string())
            })?,
        };

        self.completed += 1;
        self.sketch = Arc::new(Sketch::default());

        let name = format!("Drawn {} {}", mode, self.completed);
        tracing::info!(name = %name, "Completed drawing");
        Ok(AreaFeature::new(name, geometry, AreaSource::Drawn))
    }

    /// Layer showing the drawing while a draw mode is active
    pub fn draw_layer(&self) -> Option<RenderLayer> {
        self.is_drawing().then(|| RenderLayer {
            id: DRAW_LAYER_ID,
            data: LayerData::Sketch(Arc::clone(&self.sketch)),
            style: DRAW_STYLE,
        })
    }
}

fn incomplete(mode: DrawMode, reason: String) -> FootprintError {
    FootprintError::InvalidGeometry { feature: format!("drawn {}", mode), reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_draw_closes_ring() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Polygon);
        for (lon, lat) in [(36.80, -1.30), (36.84, -1.30), (36.84, -1.26)] {
            session.add_vertex(lon, lat).unwrap();
        }

        let area = session.complete().unwrap();
        let Geometry::Polygon { coordinates } = &area.geometry else { panic!("expected polygon") };

        assert_eq!(coordinates[0].len(), 4);
        assert_eq!(coordinates[0][0], coordinates[0][3]);
        assert_eq!(area.source, AreaSource::Drawn);
        assert_eq!(area.name, "Drawn polygon 1");
        assert_eq!(session.mode(), DrawMode::View);
        assert!(session.vertices().is_empty());
    }

    #[test]
    fn test_rectangle_uses_first_and_last_vertex() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Rectangle);
        session.add_vertex(1.0, 1.0).unwrap();
        session.add_vertex(5.0, 9.0).unwrap();
        session.add_vertex(3.0, 4.0).unwrap();

        let area = session.complete().unwrap();
        let Geometry::Polygon { coordinates } = &area.geometry else { panic!("expected polygon") };
        assert_eq!(coordinates[0].len(), 5);
        assert!(coordinates[0].contains(&[3.0, 4.0]));
        assert!(coordinates[0].contains(&[1.0, 1.0]));
    }

    #[test]
    fn test_incomplete_polygon_stays_in_mode() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Polygon);
        session.add_vertex(0.0, 0.0).unwrap();
        session.add_vertex(1.0, 0.0).unwrap();

        let err = session.complete().unwrap_err();
        assert!(matches!(err, FootprintError::InvalidGeometry { .. }));
        assert_eq!(session.mode(), DrawMode::Polygon);
        assert_eq!(session.vertices().len(), 2);

        session.add_vertex(1.0, 1.0).unwrap();
        assert!(session.complete().is_ok());
    }

    #[test]
    fn test_degenerate_rectangle_is_rejected() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Rectangle);
        session.add_vertex(2.0, 2.0).unwrap();
        assert!(session.complete().is_err());
        session.add_vertex(2.0, 7.0).unwrap();
        assert!(session.complete().is_err());
        assert_eq!(session.mode(), DrawMode::Rectangle);
    }

    #[test]
    fn test_complete_without_draw() {
        let mut session = DrawSession::new();
        assert!(matches!(session.complete(), Err(FootprintError::NoActiveDraw)));
        assert!(matches!(session.add_vertex(0.0, 0.0), Err(FootprintError::NoActiveDraw)));
    }

    #[test]
    fn test_cancel_emits_nothing() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Polygon);
        session.add_vertex(0.0, 0.0).unwrap();
        session.cancel();

        assert_eq!(session.mode(), DrawMode::View);
        assert!(session.vertices().is_empty());
        assert!(matches!(session.complete(), Err(FootprintError::NoActiveDraw)));
    }

    #[test]
    fn test_restart_discards_vertices() {
        let mut session = DrawSession::new();
        session.start(DrawMode::Polygon);
        session.add_vertex(0.0, 0.0).unwrap();
        session.start(DrawMode::Rectangle);

        assert_eq!(session.mode(), DrawMode::Rectangle);
        assert!(session.vertices().is_empty());
    }

    #[test]
    fn test_draw_layer_only_while_drawing() {
        let mut session = DrawSession::new();
        assert!(session.draw_layer().is_none());

        session.start(DrawMode::Polygon);
        let layer = session.draw_layer().unwrap();
        assert_eq!(layer.id, DRAW_LAYER_ID);
        assert_eq!(layer.style.fill, [255, 165, 0, 40]);
        assert_eq!(layer.style.line, [255, 165, 0, 255]);
        assert_eq!(layer.style.line_width_px, 2.0);

        session.cancel();
        assert!(session.draw_layer().is_none());
    }
}
