use scene::graph::SceneGraph;
use state::store::Store;

/// Publishes the engine's visible bounds into the store.
///
/// Called on load-complete and after every movement settle; this is the
/// sole producer of the view-state bounding box. Before the first load the
/// engine reports no bounds and the store field stays `None`.
pub fn refresh_viewport<S: SceneGraph + ?Sized>(engine: &S, store: &mut Store) {
    if let Some(bounds) = engine.visible_bounds() {
        store.set_viewport(bounds);
    }
}
