use std::collections::BTreeMap;

use foundation::bounds::LonLatBounds;

use crate::expr::{Expr, Feature, matches};
use crate::graph::{SceneError, SceneGraph, SceneOp};
use crate::spec::{LayerSpec, RenderedFeature, ScreenPoint, SourceSpec};

#[derive(Debug, Clone)]
struct PlacedFeature {
    source_layer: String,
    x: f64,
    y: f64,
    radius: f64,
    feature: Feature,
}

/// Deterministic in-memory scene graph.
///
/// Reference implementation of [`SceneGraph`] for tests and the demo
/// viewer: features are placed at screen positions with a hit radius, and
/// rendered-feature queries honor layer visibility and filters the way a
/// real tile renderer would.
///
/// Notes on determinism:
/// - Sources are keyed in a `BTreeMap`; layers keep insertion order.
/// - Every mutation appends a [`SceneOp`] to a drainable journal, so call
///   sequences can be asserted exactly.
#[derive(Debug, Default)]
pub struct MemoryScene {
    sources: BTreeMap<String, SourceSpec>,
    layers: Vec<LayerSpec>,
    features: BTreeMap<String, Vec<PlacedFeature>>,
    bounds: Option<LonLatBounds>,
    zoom: f64,
    journal: Vec<SceneOp>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            zoom: 12.0,
            ..Self::default()
        }
    }

    /// Places a feature on a source layer at a screen position.
    ///
    /// Placement order within a source layer is preserved by queries.
    pub fn place_feature(
        &mut self,
        source: impl Into<String>,
        source_layer: impl Into<String>,
        x: f64,
        y: f64,
        radius: f64,
        feature: Feature,
    ) {
        self.features.entry(source.into()).or_default().push(PlacedFeature {
            source_layer: source_layer.into(),
            x,
            y,
            radius,
            feature,
        });
    }

    /// Simulates a camera settle at the given bounds.
    pub fn set_visible_bounds(&mut self, bounds: LonLatBounds) {
        self.bounds = Some(bounds);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    /// Layer ids in z-order (insertion order).
    pub fn layer_order(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn journal(&self) -> &[SceneOp] {
        &self.journal
    }

    pub fn drain_journal(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.journal)
    }

    fn layer_mut(&mut self, id: &str) -> Result<&mut LayerSpec, SceneError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| SceneError::UnknownLayer(id.to_string()))
    }
}

impl SceneGraph for MemoryScene {
    fn add_source(&mut self, spec: SourceSpec) -> Result<(), SceneError> {
        if self.sources.contains_key(&spec.id) {
            return Err(SceneError::DuplicateSource(spec.id));
        }
        self.journal.push(SceneOp::AddSource {
            id: spec.id.clone(),
        });
        self.sources.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), SceneError> {
        if !self.sources.contains_key(id) {
            return Err(SceneError::UnknownSource(id.to_string()));
        }
        if let Some(layer) = self.layers.iter().find(|l| l.source == id) {
            return Err(SceneError::SourceInUse {
                source: id.to_string(),
                layer: layer.id.clone(),
            });
        }
        self.sources.remove(id);
        self.journal.push(SceneOp::RemoveSource { id: id.to_string() });
        Ok(())
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), SceneError> {
        if self.layers.iter().any(|l| l.id == spec.id) {
            return Err(SceneError::DuplicateLayer(spec.id));
        }
        if !self.sources.contains_key(&spec.source) {
            return Err(SceneError::UnknownSource(spec.source));
        }
        self.journal.push(SceneOp::AddLayer {
            id: spec.id.clone(),
        });
        self.layers.push(spec);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), SceneError> {
        let Some(idx) = self.layers.iter().position(|l| l.id == id) else {
            return Err(SceneError::UnknownLayer(id.to_string()));
        };
        self.layers.remove(idx);
        self.journal.push(SceneOp::RemoveLayer { id: id.to_string() });
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn set_visibility(&mut self, layer: &str, visible: bool) -> Result<(), SceneError> {
        self.layer_mut(layer)?.visible = visible;
        self.journal.push(SceneOp::SetVisibility {
            layer: layer.to_string(),
            visible,
        });
        Ok(())
    }

    fn set_filter(&mut self, layer: &str, filter: Option<Expr>) -> Result<(), SceneError> {
        self.layer_mut(layer)?.filter = filter;
        self.journal.push(SceneOp::SetFilter {
            layer: layer.to_string(),
        });
        Ok(())
    }

    fn set_paint(&mut self, layer: &str, property: &str, value: Expr) -> Result<(), SceneError> {
        let spec = self.layer_mut(layer)?;
        if let Some(slot) = spec.paint.iter_mut().find(|(name, _)| name == property) {
            slot.1 = value;
        } else {
            spec.paint.push((property.to_string(), value));
        }
        self.journal.push(SceneOp::SetPaint {
            layer: layer.to_string(),
            property: property.to_string(),
        });
        Ok(())
    }

    fn query_rendered_features(&self, point: ScreenPoint, layers: &[&str]) -> Vec<RenderedFeature> {
        let mut out = Vec::new();

        for id in layers {
            let Some(layer) = self.layer(id) else {
                continue;
            };
            if !layer.visible {
                continue;
            }
            let Some(placed) = self.features.get(&layer.source) else {
                continue;
            };

            for p in placed {
                if p.source_layer != layer.source_layer {
                    continue;
                }
                let dx = p.x - point.x;
                let dy = p.y - point.y;
                if dx * dx + dy * dy > p.radius * p.radius {
                    continue;
                }
                if let Some(filter) = &layer.filter
                    && !matches(filter, &p.feature, self.zoom)
                {
                    continue;
                }
                out.push(RenderedFeature {
                    layer_id: layer.id.clone(),
                    feature: p.feature.clone(),
                });
            }
        }

        out
    }

    fn visible_bounds(&self) -> Option<LonLatBounds> {
        self.bounds
    }
}
