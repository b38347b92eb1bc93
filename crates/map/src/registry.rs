use scene::graph::{SceneError, SceneGraph};
use scene::spec::LayerKind;
use state::model::RunId;

/// One materialized run-scoped layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEntry {
    pub layer_id: String,
    pub source_id: String,
    pub kind: LayerKind,
}

/// Bookkeeping for the run-scoped layers and sources currently alive.
///
/// Lifetime model: at most one generation, keyed by `(run id, tile
/// version)`, exists at a time. A generation is torn down fully (every
/// layer, then every source) before the next one is created; teardown is
/// exactly-once because the bookkeeping is drained as it is applied.
#[derive(Debug, Default)]
pub struct RunLayerRegistry {
    entries: Vec<RunEntry>,
    sources: Vec<String>,
    generation: Option<(RunId, u64)>,
}

impl RunLayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> Option<&(RunId, u64)> {
        self.generation.as_ref()
    }

    /// True when the registry already reflects this exact generation.
    pub fn matches_generation(&self, run_id: &RunId, tile_version: u64) -> bool {
        self.generation
            .as_ref()
            .is_some_and(|(r, v)| r == run_id && *v == tile_version)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.sources.is_empty()
    }

    pub fn entries(&self) -> &[RunEntry] {
        &self.entries
    }

    pub fn record_source(&mut self, id: impl Into<String>) {
        self.sources.push(id.into());
    }

    pub fn record_layer(&mut self, entry: RunEntry) {
        self.entries.push(entry);
    }

    pub fn set_generation(&mut self, run_id: RunId, tile_version: u64) {
        self.generation = Some((run_id, tile_version));
    }

    /// Removes every tracked layer, then every tracked source, then clears
    /// the bookkeeping.
    ///
    /// Layers go first: the engine refuses to drop a source a layer still
    /// references. Removal is guarded by existence so a layer the engine
    /// never materialized does not fail the sweep.
    pub fn teardown<S: SceneGraph + ?Sized>(&mut self, engine: &mut S) -> Result<(), SceneError> {
        for entry in self.entries.drain(..) {
            if engine.has_layer(&entry.layer_id) {
                engine.remove_layer(&entry.layer_id)?;
            }
        }
        for id in self.sources.drain(..) {
            if engine.has_source(&id) {
                engine.remove_source(&id)?;
            }
        }
        self.generation = None;
        Ok(())
    }
}
