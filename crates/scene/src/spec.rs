use crate::expr::{Expr, Feature};

/// Rendering primitive a layer draws with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerKind {
    Circle,
    Line,
    Fill,
    FillExtrusion,
}

/// Pointer position in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A tiled vector source. `tiles` is a URL template with `{z}/{x}/{y}`
/// placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub id: String,
    pub tiles: String,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl SourceSpec {
    pub fn new(id: impl Into<String>, tiles: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tiles: tiles.into(),
            tile_size: 512,
            min_zoom: 0,
            max_zoom: 16,
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }
}

/// A paint layer over one source layer of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub source_layer: String,
    pub kind: LayerKind,
    /// Paint properties as ordered `(name, expression)` pairs.
    pub paint: Vec<(String, Expr)>,
    pub visible: bool,
    pub filter: Option<Expr>,
}

impl LayerSpec {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        kind: LayerKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_layer: source_layer.into(),
            kind,
            paint: Vec::new(),
            visible: true,
            filter: None,
        }
    }

    pub fn with_paint(mut self, property: impl Into<String>, value: Expr) -> Self {
        self.paint.push((property.into(), value));
        self
    }

    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn paint_property(&self, property: &str) -> Option<&Expr> {
        self.paint
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, e)| e)
    }
}

/// A feature returned from a rendered-features query, tagged with the
/// layer it was matched on.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub layer_id: String,
    pub feature: Feature,
}
