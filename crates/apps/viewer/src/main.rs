use std::env;

use clap::Parser;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use api::endpoints;
use api::session::DetailGate;
use foundation::bounds::LonLatBounds;
use map::adapter::MapAdapter;
use map::catalog::{self, TileEndpoints};
use map::{hit, tooltip, viewport};
use scene::expr::{Feature, Value};
use scene::graph::SceneError;
use scene::memory::MemoryScene;
use scene::spec::ScreenPoint;
use state::model::{ColorView, LayerVisibility, RunId, Selection};
use state::store::Store;

/// Scripted demo session: drives the reconciliation engine against the
/// in-memory reference scene and logs every mutation batch.
#[derive(Parser, Debug)]
#[command(author, version, about = "Displacement-atlas demo viewer")]
struct Args {
    /// Base URL of the static tile server
    #[arg(long)]
    tiles_base: Option<String>,

    /// Base URL of the analysis API
    #[arg(long)]
    api_base: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let tiles_base = args
        .tiles_base
        .or_else(|| env::var("TILES_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    let api_base = args
        .api_base
        .or_else(|| env::var("API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());

    if let Err(e) = run_session(TileEndpoints::new(tiles_base, api_base)) {
        error!("viewer session failed: {e}");
        std::process::exit(1);
    }
}

fn run_session(endpoints: TileEndpoints) -> Result<(), SceneError> {
    let mut store = Store::new();
    let mut adapter = MapAdapter::new(seeded_scene(), endpoints);
    let mut gate = DetailGate::new();
    let mut ops_total = 0usize;

    // Engine load completes: static scene goes up, viewport publishes.
    adapter.initialize(store.state())?;
    adapter
        .engine_mut()
        .set_visible_bounds(LonLatBounds::new(12.95, 47.75, 13.15, 47.85));
    viewport::refresh_viewport(adapter.engine(), &mut store);
    pump("load", &mut store, &mut adapter, &mut ops_total)?;

    // Turn the building footprint layers on.
    store.set_layers(LayerVisibility {
        gba: true,
        osm: true,
        ..LayerVisibility::default()
    });
    pump("layer toggles", &mut store, &mut adapter, &mut ops_total)?;

    // Tighten the quality filters.
    let mut filters = store.state().filters;
    filters.coherence_min = 0.8;
    store.set_filters(filters);
    pump("filters", &mut store, &mut adapter, &mut ops_total)?;

    // Click a measurement point; a detail fetch would start here.
    click(&mut store, &mut adapter, &mut gate, 100.0, 100.0);
    pump("point click", &mut store, &mut adapter, &mut ops_total)?;

    // Activate an analysis run and explore its encodings.
    store.set_active_run_id(Some(RunId::new("0b6ad1f2-demo-run")));
    pump("run activation", &mut store, &mut adapter, &mut ops_total)?;

    if let Some(t) = tooltip::hover(adapter.engine(), ScreenPoint::new(300.0, 200.0)) {
        info!(title = %t.title, rows = t.rows.len(), "hover tooltip");
    }

    store.set_color_view(ColorView::Velocity);
    pump("color view", &mut store, &mut adapter, &mut ops_total)?;

    // Results changed server-side: force fresh tiles.
    store.bump_tile_version();
    pump("tile refresh", &mut store, &mut adapter, &mut ops_total)?;

    // Click a run building, then the empty background.
    click(&mut store, &mut adapter, &mut gate, 320.0, 210.0);
    pump("building click", &mut store, &mut adapter, &mut ops_total)?;
    click(&mut store, &mut adapter, &mut gate, 600.0, 600.0);
    pump("background click", &mut store, &mut adapter, &mut ops_total)?;

    // Deactivate the run; its layers and sources are torn down.
    store.set_active_run_id(None);
    pump("run teardown", &mut store, &mut adapter, &mut ops_total)?;

    let state = store.state();
    let summary = json!({
        "scene_ops": ops_total,
        "run_generation": adapter.registry().generation().map(|(r, v)| json!({
            "run_id": r.as_str(),
            "tile_version": v,
        })),
        "layer_order": adapter.engine().layer_order(),
        "viewport": state.viewport.map(LonLatBounds::to_array),
        "selection": state.selection.as_ref().map(|s| serde_json::to_value(s).unwrap_or_default()),
    });
    println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
    Ok(())
}

/// Drains one store batch into the adapter, logging the mutations.
fn pump(
    label: &str,
    store: &mut Store,
    adapter: &mut MapAdapter<MemoryScene>,
    ops_total: &mut usize,
) -> Result<(), SceneError> {
    let batch = store.drain_changes();
    for field in &batch {
        let state = store.state().clone();
        adapter.apply(*field, &state)?;
    }
    let ops = adapter.engine_mut().drain_journal();
    *ops_total += ops.len();
    info!(
        step = label,
        fields = batch.len(),
        scene_ops = ops.len(),
        "applied batch"
    );
    for op in &ops {
        info!(step = label, ?op, "scene op");
    }
    Ok(())
}

fn click(
    store: &mut Store,
    adapter: &mut MapAdapter<MemoryScene>,
    gate: &mut DetailGate,
    x: f64,
    y: f64,
) {
    hit::handle_click(adapter.engine(), ScreenPoint::new(x, y), store);

    // Detail fetches are keyed by the selection they were issued for;
    // a stale response is dropped when the ticket no longer matches.
    let selection = store.state().selection.clone();
    let ticket = gate.begin(selection.clone());
    match &selection {
        Some(Selection::Point { code, track }) => {
            info!(path = %endpoints::point_detail(code, *track), "fetch point detail");
            info!(path = %endpoints::point_timeseries(code, *track), "fetch timeseries");
        }
        Some(Selection::Building { source, id }) => {
            info!(path = %endpoints::building_detail(*source, id), "fetch building detail");
            info!(path = %endpoints::building_points(*source, id), "fetch linked points");
        }
        None => info!("selection cleared"),
    }
    if gate.accepts(&ticket) {
        info!("detail response would be accepted");
    }
}

/// Reference scene with a handful of demo features on the static and
/// run-scoped source layers.
fn seeded_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.set_zoom(14.0);

    scene.place_feature(
        catalog::INSAR_T44,
        catalog::INSAR_T44,
        100.0,
        100.0,
        6.0,
        feature(&[
            ("code", Value::from("P42")),
            ("velocity", Value::Number(-3.2)),
            ("coherence", Value::Number(0.85)),
        ]),
    );
    scene.place_feature(
        catalog::INSAR_T95,
        catalog::INSAR_T95,
        140.0,
        100.0,
        6.0,
        feature(&[
            ("code", Value::from("P87")),
            ("velocity", Value::Number(1.4)),
            ("coherence", Value::Number(0.91)),
        ]),
    );
    scene.place_feature(
        catalog::GBA,
        catalog::GBA,
        200.0,
        150.0,
        12.0,
        feature(&[("gba_id", Value::from("G7")), ("height", Value::Number(14.0))]),
    );
    scene.place_feature(
        catalog::OSM,
        catalog::OSM,
        240.0,
        160.0,
        12.0,
        feature(&[
            ("osm_id", Value::Number(773311.0)),
            ("name", Value::from("Residenz")),
            ("building_type", Value::from("civic")),
        ]),
    );
    scene.place_feature(
        catalog::ML_POINTS,
        catalog::ML_POINTS,
        300.0,
        200.0,
        6.0,
        feature(&[
            ("code", Value::from("P42")),
            ("track", Value::Number(44.0)),
            ("cluster_id", Value::from("c5")),
            ("cluster_color_index", Value::Number(5.0)),
            ("method", Value::from("buffer")),
            ("velocity", Value::Number(-3.2)),
        ]),
    );
    scene.place_feature(
        catalog::ML_BUILDINGS,
        catalog::ML_BUILDINGS,
        320.0,
        210.0,
        12.0,
        feature(&[
            ("building_source", Value::from("gba")),
            ("building_id", Value::from("G7")),
            ("building_color_index", Value::Number(12.0)),
            ("height_m", Value::Number(18.0)),
        ]),
    );

    scene
}

fn feature(pairs: &[(&str, Value)]) -> Feature {
    Feature::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}
