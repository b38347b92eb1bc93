use foundation::bounds::LonLatBounds;

use crate::expr::Expr;
use crate::spec::{LayerSpec, RenderedFeature, ScreenPoint, SourceSpec};

/// Contract violations the scene graph refuses.
///
/// Note the asymmetry with mutation guards elsewhere: callers are expected
/// to probe `has_layer`/`has_source` before touching objects that may not
/// exist yet, so `Unknown*` only surfaces when that discipline is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    DuplicateSource(String),
    DuplicateLayer(String),
    UnknownSource(String),
    UnknownLayer(String),
    /// A source cannot be removed while a layer still references it.
    SourceInUse { source: String, layer: String },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::DuplicateSource(id) => write!(f, "source already exists: {id}"),
            SceneError::DuplicateLayer(id) => write!(f, "layer already exists: {id}"),
            SceneError::UnknownSource(id) => write!(f, "unknown source: {id}"),
            SceneError::UnknownLayer(id) => write!(f, "unknown layer: {id}"),
            SceneError::SourceInUse { source, layer } => {
                write!(f, "source {source} still referenced by layer {layer}")
            }
        }
    }
}

impl std::error::Error for SceneError {}

/// One scene mutation, as recorded in the engine journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneOp {
    AddSource { id: String },
    RemoveSource { id: String },
    AddLayer { id: String },
    RemoveLayer { id: String },
    SetVisibility { layer: String, visible: bool },
    SetFilter { layer: String },
    SetPaint { layer: String, property: String },
}

/// The externally supplied scene-graph mutation interface.
///
/// One live instance exists per map; the adapter owns it exclusively and
/// is the only component allowed to call the mutating methods.
pub trait SceneGraph {
    fn add_source(&mut self, spec: SourceSpec) -> Result<(), SceneError>;
    fn remove_source(&mut self, id: &str) -> Result<(), SceneError>;
    fn has_source(&self, id: &str) -> bool;

    fn add_layer(&mut self, spec: LayerSpec) -> Result<(), SceneError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), SceneError>;
    fn has_layer(&self, id: &str) -> bool;

    fn set_visibility(&mut self, layer: &str, visible: bool) -> Result<(), SceneError>;
    /// `None` clears any active filter (all features pass).
    fn set_filter(&mut self, layer: &str, filter: Option<Expr>) -> Result<(), SceneError>;
    fn set_paint(&mut self, layer: &str, property: &str, value: Expr) -> Result<(), SceneError>;

    /// Features currently rendered under `point`, restricted to `layers`.
    ///
    /// Ordering contract: results come back grouped by the caller's layer
    /// order; the caller's priority order is the result order. Unknown
    /// and hidden layers contribute nothing.
    fn query_rendered_features(&self, point: ScreenPoint, layers: &[&str]) -> Vec<RenderedFeature>;

    /// Current visible geographic bounds; `None` before the first load
    /// completes.
    fn visible_bounds(&self) -> Option<LonLatBounds>;
}
