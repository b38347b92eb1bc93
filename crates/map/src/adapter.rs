use scene::expr::Expr;
use scene::graph::{SceneError, SceneGraph};
use state::model::{
    ActiveRun, BuildingSource, ColorView, Filters, LayerVisibility, Selection, Track, ViewState,
};
use state::store::StateField;

use crate::catalog::{self, TileEndpoints};
use crate::registry::{RunEntry, RunLayerRegistry};

/// Reconciles declarative view state against the live scene graph.
///
/// The adapter exclusively owns the engine handle; every scene mutation in
/// the system goes through one of the operations below. Each operation is
/// idempotent and guarded by existence checks, so it is safe to drive them
/// in the window between store initialization and engine load.
///
/// Two driving modes, both applying the same narrow operations:
/// - [`MapAdapter::apply`] consumes one changed field at a time, in store
///   drain order.
/// - [`MapAdapter::reconcile`] diffs the retained last-applied snapshot
///   against a new one in canonical order (layers, filters, run,
///   selection).
#[derive(Debug)]
pub struct MapAdapter<S: SceneGraph> {
    engine: S,
    endpoints: TileEndpoints,
    registry: RunLayerRegistry,
    initialized: bool,
    applied: ViewState,
}

impl<S: SceneGraph> MapAdapter<S> {
    pub fn new(engine: S, endpoints: TileEndpoints) -> Self {
        Self {
            engine,
            endpoints,
            registry: RunLayerRegistry::new(),
            initialized: false,
            applied: ViewState::default(),
        }
    }

    /// Read access for queries (hit testing, viewport reads).
    pub fn engine(&self) -> &S {
        &self.engine
    }

    /// Engine-side lifecycle hooks only (camera movement, tile arrival in
    /// the reference engine). Application components must not mutate the
    /// scene through this; they go through the typed operations.
    pub fn engine_mut(&mut self) -> &mut S {
        &mut self.engine
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn registry(&self) -> &RunLayerRegistry {
        &self.registry
    }

    /// Creates the static scene exactly once and brings it up to `state`.
    ///
    /// Subsequent calls are no-ops.
    pub fn initialize(&mut self, state: &ViewState) -> Result<(), SceneError> {
        if self.initialized {
            return Ok(());
        }

        for source in catalog::static_sources(&self.endpoints) {
            self.engine.add_source(source)?;
        }
        for layer in catalog::static_layers() {
            self.engine.add_layer(layer)?;
        }
        self.initialized = true;

        self.set_layer_visibility(&state.layers)?;
        self.set_filters(&state.filters, state.filters_enabled)?;
        self.set_selection_highlight(state.selection.as_ref())?;
        self.sync_active_run(&state.active_run)?;
        self.applied = state.clone();
        Ok(())
    }

    /// Applies the four static-layer toggles. Layers the engine has not
    /// created yet are silently skipped.
    pub fn set_layer_visibility(&mut self, vis: &LayerVisibility) -> Result<(), SceneError> {
        let toggles = [
            (catalog::INSAR_T44, vis.track_44),
            (catalog::INSAR_T95, vis.track_95),
            (catalog::GBA, vis.gba),
            (catalog::OSM, vis.osm),
        ];
        for (layer, visible) in toggles {
            self.set_visibility_if_present(layer, visible)?;
        }
        Ok(())
    }

    /// Applies (or clears) the measurement filters on both tracks.
    ///
    /// Bounds are applied as given; an inverted velocity range matches
    /// nothing.
    pub fn set_filters(&mut self, filters: &Filters, enabled: bool) -> Result<(), SceneError> {
        let filter = enabled.then(|| {
            Expr::all(vec![
                Expr::ge(Expr::get("velocity"), filters.velocity_min),
                Expr::le(Expr::get("velocity"), filters.velocity_max),
                Expr::ge(Expr::get("coherence"), filters.coherence_min),
            ])
        });
        for layer in [catalog::INSAR_T44, catalog::INSAR_T95] {
            self.set_filter_if_present(layer, filter.clone())?;
        }
        Ok(())
    }

    /// Points the highlight layers at the current selection.
    ///
    /// A point selection without a track highlights the code on both
    /// tracks; with a track, the other track's highlight is reset. The
    /// highlight families are mutually exclusive by construction of
    /// `Selection`.
    pub fn set_selection_highlight(
        &mut self,
        selection: Option<&Selection>,
    ) -> Result<(), SceneError> {
        let mut t44 = catalog::match_nothing("code");
        let mut t95 = catalog::match_nothing("code");
        let mut gba = catalog::match_nothing("gba_id");
        let mut osm = catalog::match_nothing("osm_id");

        match selection {
            None => {}
            Some(Selection::Point { code, track }) => {
                if track.is_none() || *track == Some(Track::T44) {
                    t44 = Expr::eq_str(Expr::get("code"), code.as_str());
                }
                if track.is_none() || *track == Some(Track::T95) {
                    t95 = Expr::eq_str(Expr::get("code"), code.as_str());
                }
            }
            Some(Selection::Building { source, id }) => match source {
                BuildingSource::Gba => gba = Expr::eq_str(Expr::get("gba_id"), id.as_str()),
                BuildingSource::Osm => osm = Expr::eq_str(Expr::get("osm_id"), id.as_str()),
            },
        }

        self.set_filter_if_present(catalog::INSAR_SELECTED_T44, Some(t44))?;
        self.set_filter_if_present(catalog::INSAR_SELECTED_T95, Some(t95))?;
        self.set_filter_if_present(catalog::GBA_HIGHLIGHT, Some(gba))?;
        self.set_filter_if_present(catalog::OSM_HIGHLIGHT, Some(osm))?;
        Ok(())
    }

    /// Tears down the previous run generation and materializes the new
    /// one, if any.
    ///
    /// Re-invoking with a `(run id, tile version)` pair the registry
    /// already reflects is a no-op. Teardown always completes fully
    /// (layers, then sources) before any same-named object is recreated.
    pub fn sync_active_run(&mut self, run: &ActiveRun) -> Result<(), SceneError> {
        if let Some(run_id) = &run.run_id
            && self.registry.matches_generation(run_id, run.tile_version)
        {
            return Ok(());
        }

        self.registry.teardown(&mut self.engine)?;

        let Some(run_id) = &run.run_id else {
            return Ok(());
        };

        for source in catalog::run_sources(&self.endpoints, run_id, run.tile_version) {
            let id = source.id.clone();
            self.engine.add_source(source)?;
            self.registry.record_source(id);
        }
        for layer in catalog::run_layers(run) {
            let entry = RunEntry {
                layer_id: layer.id.clone(),
                source_id: layer.source.clone(),
                kind: layer.kind,
            };
            self.engine.add_layer(layer)?;
            self.registry.record_layer(entry);
        }
        self.registry.set_generation(run_id.clone(), run.tile_version);
        Ok(())
    }

    /// Show/hide the materialized run layers without recreating them.
    pub fn set_run_layer_visibility(
        &mut self,
        show_points: bool,
        show_buildings: bool,
    ) -> Result<(), SceneError> {
        for layer in [
            catalog::ML_BUILDINGS_FLAT,
            catalog::ML_BUILDINGS_FILL,
            catalog::ML_BUILDINGS_OUTLINE,
            catalog::ML_POINTS,
        ] {
            let visible = if catalog::run_layer_shows_points(layer) {
                show_points
            } else {
                show_buildings
            };
            self.set_visibility_if_present(layer, visible)?;
        }
        Ok(())
    }

    /// Swaps the run point layer's color ramp in place.
    pub fn set_color_view(&mut self, view: ColorView) -> Result<(), SceneError> {
        if self.engine.has_layer(catalog::ML_POINTS) {
            self.engine.set_paint(
                catalog::ML_POINTS,
                "circle-color",
                crate::ramps::color_view_ramp(view),
            )?;
        }
        Ok(())
    }

    /// Applies one changed store field against the current snapshot.
    ///
    /// Within a drained batch the caller feeds fields in first-change
    /// order; values are read from `state`, so a later write to the same
    /// slice wins.
    pub fn apply(&mut self, field: StateField, state: &ViewState) -> Result<(), SceneError> {
        match field {
            StateField::Layers => {
                self.set_layer_visibility(&state.layers)?;
                self.applied.layers = state.layers;
            }
            StateField::Filters => {
                self.set_filters(&state.filters, state.filters_enabled)?;
                self.applied.filters = state.filters;
                self.applied.filters_enabled = state.filters_enabled;
            }
            StateField::Selection => {
                self.set_selection_highlight(state.selection.as_ref())?;
                self.applied.selection = state.selection.clone();
            }
            StateField::ActiveRun => {
                let prev = self.applied.active_run.clone();
                let next = &state.active_run;
                if prev.run_id != next.run_id || prev.tile_version != next.tile_version {
                    self.sync_active_run(next)?;
                } else {
                    if prev.show_points != next.show_points
                        || prev.show_buildings != next.show_buildings
                    {
                        self.set_run_layer_visibility(next.show_points, next.show_buildings)?;
                    }
                    if prev.color_view != next.color_view {
                        self.set_color_view(next.color_view)?;
                    }
                }
                self.applied.active_run = next.clone();
            }
            StateField::Viewport => {
                // Camera output, not a scene input; nothing to mutate.
                self.applied.viewport = state.viewport;
            }
        }
        Ok(())
    }

    /// Diff-and-apply: compares the retained snapshot against `next` and
    /// applies the changed slices in canonical order.
    pub fn reconcile(&mut self, next: &ViewState) -> Result<(), SceneError> {
        if self.applied.layers != next.layers {
            self.apply(StateField::Layers, next)?;
        }
        if self.applied.filters != next.filters || self.applied.filters_enabled != next.filters_enabled
        {
            self.apply(StateField::Filters, next)?;
        }
        if self.applied.active_run != next.active_run {
            self.apply(StateField::ActiveRun, next)?;
        }
        if self.applied.selection != next.selection {
            self.apply(StateField::Selection, next)?;
        }
        if self.applied.viewport != next.viewport {
            self.applied.viewport = next.viewport;
        }
        Ok(())
    }

    fn set_visibility_if_present(&mut self, layer: &str, visible: bool) -> Result<(), SceneError> {
        if self.engine.has_layer(layer) {
            self.engine.set_visibility(layer, visible)?;
        }
        Ok(())
    }

    fn set_filter_if_present(
        &mut self,
        layer: &str,
        filter: Option<Expr>,
    ) -> Result<(), SceneError> {
        if self.engine.has_layer(layer) {
            self.engine.set_filter(layer, filter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::MapAdapter;
    use crate::catalog::{
        self, GBA_HIGHLIGHT, INSAR_SELECTED_T44, INSAR_SELECTED_T95, INSAR_T44, INSAR_T95,
        ML_BUILDINGS, ML_BUILDINGS_FILL, ML_BUILDINGS_FLAT, ML_BUILDINGS_OUTLINE, ML_POINTS,
        OSM_HIGHLIGHT, TileEndpoints,
    };
    use scene::expr::{Expr, Feature, Value};
    use scene::graph::{SceneGraph, SceneOp};
    use scene::memory::MemoryScene;
    use scene::spec::ScreenPoint;
    use state::model::{
        ActiveRun, BuildingSource, ColorView, Filters, LayerVisibility, RunId, Selection, Track,
        ViewState,
    };
    use state::store::StateField;

    fn endpoints() -> TileEndpoints {
        TileEndpoints::new("http://tiles:8000", "http://api:8000")
    }

    fn adapter() -> MapAdapter<MemoryScene> {
        let mut a = MapAdapter::new(MemoryScene::new(), endpoints());
        a.initialize(&ViewState::new()).unwrap();
        a
    }

    fn run(id: &str, version: u64) -> ActiveRun {
        ActiveRun {
            run_id: Some(RunId::new(id)),
            tile_version: version,
            ..ActiveRun::default()
        }
    }

    fn measurement_feature(code: &str, velocity: f64, coherence: f64) -> Feature {
        Feature::new(vec![
            ("code".to_string(), Value::from(code)),
            ("velocity".to_string(), Value::Number(velocity)),
            ("coherence".to_string(), Value::Number(coherence)),
        ])
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut a = adapter();
        let before = a.engine_mut().drain_journal();
        assert!(!before.is_empty());

        a.initialize(&ViewState::new()).unwrap();
        assert_eq!(a.engine_mut().drain_journal(), vec![]);
    }

    #[test]
    fn initialize_creates_the_static_scene() {
        let a = adapter();
        for id in [INSAR_T44, INSAR_T95, "gba", "osm"] {
            assert!(a.engine().has_source(id));
            assert!(a.engine().has_layer(id));
        }
        for id in [
            INSAR_SELECTED_T44,
            INSAR_SELECTED_T95,
            GBA_HIGHLIGHT,
            OSM_HIGHLIGHT,
        ] {
            let layer = a.engine().layer(id).expect("highlight layer");
            assert!(layer.filter.is_some());
        }
        // Default view: tracks on, building layers off.
        assert!(a.engine().layer(INSAR_T44).unwrap().visible);
        assert!(!a.engine().layer("gba").unwrap().visible);
        assert!(!a.engine().layer("osm").unwrap().visible);
    }

    #[test]
    fn mutations_before_initialize_are_silently_skipped() {
        let mut a = MapAdapter::new(MemoryScene::new(), endpoints());
        a.set_layer_visibility(&LayerVisibility::default()).unwrap();
        a.set_filters(&Filters::default(), true).unwrap();
        a.set_selection_highlight(Some(&Selection::point("P1", None)))
            .unwrap();
        assert_eq!(a.engine_mut().drain_journal(), vec![]);
    }

    #[test]
    fn disabled_filters_clear_both_measurement_layers() {
        let mut a = adapter();
        a.engine_mut().place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            measurement_feature("P1", 99.0, 0.0),
        );

        a.set_filters(&Filters::default(), false).unwrap();
        assert!(a.engine().layer(INSAR_T44).unwrap().filter.is_none());
        assert!(a.engine().layer(INSAR_T95).unwrap().filter.is_none());

        // Everything renders regardless of quality.
        let hits = a
            .engine()
            .query_rendered_features(ScreenPoint::new(0.0, 0.0), &[INSAR_T44]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn enabled_filters_are_a_conjunction_of_ranges() {
        let mut a = adapter();
        let engine = a.engine_mut();
        engine.place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            measurement_feature("in", 1.0, 0.9),
        );
        engine.place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            measurement_feature("fast", 15.0, 0.9),
        );
        engine.place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            measurement_feature("noisy", 1.0, 0.2),
        );

        a.set_filters(&Filters::default(), true).unwrap();
        let hits = a
            .engine()
            .query_rendered_features(ScreenPoint::new(0.0, 0.0), &[INSAR_T44]);
        let codes: Vec<&str> = hits
            .iter()
            .filter_map(|h| h.feature.get("code").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(codes, vec!["in"]);
    }

    #[test]
    fn inverted_velocity_bounds_match_nothing() {
        let mut a = adapter();
        a.engine_mut().place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            measurement_feature("P1", 0.0, 1.0),
        );
        let filters = Filters {
            velocity_min: 5.0,
            velocity_max: -5.0,
            coherence_min: 0.0,
        };
        a.set_filters(&filters, true).unwrap();
        assert!(
            a.engine()
                .query_rendered_features(ScreenPoint::new(0.0, 0.0), &[INSAR_T44])
                .is_empty()
        );
    }

    #[test]
    fn point_selection_with_track_highlights_one_layer() {
        let mut a = adapter();
        a.set_selection_highlight(Some(&Selection::point("P1", Some(Track::T95))))
            .unwrap();

        let t95 = a.engine().layer(INSAR_SELECTED_T95).unwrap();
        assert_eq!(
            t95.filter,
            Some(Expr::eq_str(Expr::get("code"), "P1"))
        );
        let t44 = a.engine().layer(INSAR_SELECTED_T44).unwrap();
        assert_eq!(t44.filter, Some(catalog::match_nothing("code")));
    }

    #[test]
    fn point_selection_without_track_highlights_both_layers() {
        let mut a = adapter();
        a.set_selection_highlight(Some(&Selection::point("P1", None)))
            .unwrap();

        let expected = Some(Expr::eq_str(Expr::get("code"), "P1"));
        assert_eq!(a.engine().layer(INSAR_SELECTED_T44).unwrap().filter, expected);
        assert_eq!(a.engine().layer(INSAR_SELECTED_T95).unwrap().filter, expected);
    }

    #[test]
    fn building_selection_highlights_its_source_only() {
        let mut a = adapter();
        a.set_selection_highlight(Some(&Selection::building(BuildingSource::Gba, "b42")))
            .unwrap();

        assert_eq!(
            a.engine().layer(GBA_HIGHLIGHT).unwrap().filter,
            Some(Expr::eq_str(Expr::get("gba_id"), "b42"))
        );
        assert_eq!(
            a.engine().layer(OSM_HIGHLIGHT).unwrap().filter,
            Some(catalog::match_nothing("osm_id"))
        );
        assert_eq!(
            a.engine().layer(INSAR_SELECTED_T44).unwrap().filter,
            Some(catalog::match_nothing("code"))
        );
    }

    #[test]
    fn clearing_selection_resets_all_highlights() {
        let mut a = adapter();
        a.set_selection_highlight(Some(&Selection::point("P1", None)))
            .unwrap();
        a.set_selection_highlight(None).unwrap();

        assert_eq!(
            a.engine().layer(INSAR_SELECTED_T44).unwrap().filter,
            Some(catalog::match_nothing("code"))
        );
        assert_eq!(
            a.engine().layer(INSAR_SELECTED_T95).unwrap().filter,
            Some(catalog::match_nothing("code"))
        );
        assert_eq!(
            a.engine().layer(GBA_HIGHLIGHT).unwrap().filter,
            Some(catalog::match_nothing("gba_id"))
        );
        assert_eq!(
            a.engine().layer(OSM_HIGHLIGHT).unwrap().filter,
            Some(catalog::match_nothing("osm_id"))
        );
    }

    #[test]
    fn run_switch_replaces_the_whole_generation() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 0)).unwrap();
        assert!(a.engine().has_layer(ML_POINTS));
        let r1_points_tiles = a.engine().source(ML_POINTS).unwrap().tiles.clone();
        assert!(r1_points_tiles.contains("/runs/r1/"));

        a.sync_active_run(&run("r2", 0)).unwrap();
        assert!(a.engine().has_layer(ML_POINTS));
        let r2_points_tiles = a.engine().source(ML_POINTS).unwrap().tiles.clone();
        assert!(r2_points_tiles.contains("/runs/r2/"));
        assert!(!r2_points_tiles.contains("r1"));
        assert_eq!(
            a.registry().generation(),
            Some(&(RunId::new("r2"), 0))
        );
    }

    #[test]
    fn clearing_the_run_leaves_no_run_objects() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 0)).unwrap();
        a.sync_active_run(&ActiveRun::default()).unwrap();

        for id in [
            ML_POINTS,
            ML_BUILDINGS_FLAT,
            ML_BUILDINGS_FILL,
            ML_BUILDINGS_OUTLINE,
        ] {
            assert!(!a.engine().has_layer(id));
        }
        assert!(!a.engine().has_source(ML_POINTS));
        assert!(!a.engine().has_source(ML_BUILDINGS));
        assert!(a.registry().is_empty());
    }

    #[test]
    fn same_generation_is_a_no_op() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 2)).unwrap();
        a.engine_mut().drain_journal();

        a.sync_active_run(&run("r1", 2)).unwrap();
        assert_eq!(a.engine_mut().drain_journal(), vec![]);
    }

    #[test]
    fn version_bump_recreates_with_fresh_tile_urls() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 0)).unwrap();
        let before = a.engine().source(ML_POINTS).unwrap().tiles.clone();

        a.sync_active_run(&run("r1", 1)).unwrap();
        let after = a.engine().source(ML_POINTS).unwrap().tiles.clone();
        assert_ne!(before, after);
        assert!(after.ends_with("?v=1"));
        assert!(after.contains("/runs/r1/"));
    }

    #[test]
    fn teardown_orders_layers_before_sources() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 0)).unwrap();
        a.engine_mut().drain_journal();

        a.sync_active_run(&run("r2", 0)).unwrap();
        let journal = a.engine_mut().drain_journal();
        let removals: Vec<&SceneOp> = journal
            .iter()
            .take_while(|op| {
                matches!(
                    op,
                    SceneOp::RemoveLayer { .. } | SceneOp::RemoveSource { .. }
                )
            })
            .collect();
        assert_eq!(
            removals,
            vec![
                &SceneOp::RemoveLayer {
                    id: ML_BUILDINGS_FLAT.to_string()
                },
                &SceneOp::RemoveLayer {
                    id: ML_BUILDINGS_FILL.to_string()
                },
                &SceneOp::RemoveLayer {
                    id: ML_BUILDINGS_OUTLINE.to_string()
                },
                &SceneOp::RemoveLayer {
                    id: ML_POINTS.to_string()
                },
                &SceneOp::RemoveSource {
                    id: ML_POINTS.to_string()
                },
                &SceneOp::RemoveSource {
                    id: ML_BUILDINGS.to_string()
                },
            ]
        );
    }

    #[test]
    fn run_creation_honors_show_flags() {
        let mut a = adapter();
        let mut r = run("r1", 0);
        r.show_points = false;
        r.show_buildings = true;
        a.sync_active_run(&r).unwrap();

        assert!(!a.engine().layer(ML_POINTS).unwrap().visible);
        assert!(a.engine().layer(ML_BUILDINGS_FLAT).unwrap().visible);

        a.set_run_layer_visibility(true, false).unwrap();
        assert!(a.engine().layer(ML_POINTS).unwrap().visible);
        assert!(!a.engine().layer(ML_BUILDINGS_OUTLINE).unwrap().visible);
    }

    #[test]
    fn color_view_swaps_paint_without_recreating() {
        let mut a = adapter();
        a.sync_active_run(&run("r1", 0)).unwrap();
        a.engine_mut().drain_journal();

        a.set_color_view(ColorView::Velocity).unwrap();
        assert_eq!(
            a.engine_mut().drain_journal(),
            vec![SceneOp::SetPaint {
                layer: ML_POINTS.to_string(),
                property: "circle-color".to_string(),
            }]
        );
        assert_eq!(
            a.engine().layer(ML_POINTS).unwrap().paint_property("circle-color"),
            Some(&crate::ramps::velocity_ramp())
        );

        // Without a run there is nothing to recolor.
        a.sync_active_run(&ActiveRun::default()).unwrap();
        a.engine_mut().drain_journal();
        a.set_color_view(ColorView::Distance).unwrap();
        assert_eq!(a.engine_mut().drain_journal(), vec![]);
    }

    #[test]
    fn apply_routes_run_subfield_changes() {
        let mut a = adapter();
        let mut state = ViewState::new();

        state.active_run = run("r1", 0);
        a.apply(StateField::ActiveRun, &state).unwrap();
        assert!(a.engine().has_layer(ML_POINTS));
        a.engine_mut().drain_journal();

        // Same generation, only flags and view changed: no recreation.
        state.active_run.show_points = false;
        state.active_run.color_view = ColorView::Coherence;
        a.apply(StateField::ActiveRun, &state).unwrap();
        let journal = a.engine_mut().drain_journal();
        assert!(
            journal
                .iter()
                .all(|op| matches!(op, SceneOp::SetVisibility { .. } | SceneOp::SetPaint { .. }))
        );
        assert!(!a.engine().layer(ML_POINTS).unwrap().visible);
    }

    #[test]
    fn reconcile_emits_a_minimal_call_sequence() {
        let mut a = adapter();
        a.engine_mut().drain_journal();

        let mut next = ViewState::new();
        next.layers.gba = true;
        next.selection = Some(Selection::point("P7", Some(Track::T44)));
        a.reconcile(&next).unwrap();

        let journal = a.engine_mut().drain_journal();
        assert_eq!(
            journal,
            vec![
                SceneOp::SetVisibility {
                    layer: INSAR_T44.to_string(),
                    visible: true,
                },
                SceneOp::SetVisibility {
                    layer: INSAR_T95.to_string(),
                    visible: true,
                },
                SceneOp::SetVisibility {
                    layer: "gba".to_string(),
                    visible: true,
                },
                SceneOp::SetVisibility {
                    layer: "osm".to_string(),
                    visible: false,
                },
                SceneOp::SetFilter {
                    layer: INSAR_SELECTED_T44.to_string()
                },
                SceneOp::SetFilter {
                    layer: INSAR_SELECTED_T95.to_string()
                },
                SceneOp::SetFilter {
                    layer: GBA_HIGHLIGHT.to_string()
                },
                SceneOp::SetFilter {
                    layer: OSM_HIGHLIGHT.to_string()
                },
            ]
        );

        // Reconciling the same snapshot again is a no-op.
        a.reconcile(&next).unwrap();
        assert_eq!(a.engine_mut().drain_journal(), vec![]);
    }
}
