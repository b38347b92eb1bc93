use scene::expr::Expr;
use scene::spec::{LayerKind, LayerSpec, SourceSpec};
use state::model::{ActiveRun, RunId};

use crate::ramps;

// Static sources and their paint layers. Source id, layer id and source
// layer name coincide for the tiled static data.
pub const INSAR_T44: &str = "insar_t44";
pub const INSAR_T95: &str = "insar_t95";
pub const GBA: &str = "gba";
pub const OSM: &str = "osm";

// Selection-highlight layers, normally matching nothing.
pub const INSAR_SELECTED_T44: &str = "insar_selected_t44";
pub const INSAR_SELECTED_T95: &str = "insar_selected_t95";
pub const GBA_HIGHLIGHT: &str = "gba_highlight";
pub const OSM_HIGHLIGHT: &str = "osm_highlight";

// Run-scoped sources and layers, materialized per analysis run.
pub const ML_POINTS: &str = "ml_points";
pub const ML_BUILDINGS: &str = "ml_buildings";
pub const ML_BUILDINGS_FLAT: &str = "ml_buildings_flat";
pub const ML_BUILDINGS_FILL: &str = "ml_buildings_fill";
pub const ML_BUILDINGS_OUTLINE: &str = "ml_buildings_outline";

pub const HIGHLIGHT_COLOR: &str = "#e27d3f";

/// Base URLs for the two tile producers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEndpoints {
    pub tiles_base: String,
    pub api_base: String,
}

impl TileEndpoints {
    pub fn new(tiles_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        let trim = |s: String| s.trim_end_matches('/').to_string();
        Self {
            tiles_base: trim(tiles_base.into()),
            api_base: trim(api_base.into()),
        }
    }

    pub fn static_tiles(&self, layer: &str) -> String {
        format!("{}/mbtiles/{layer}/{{z}}/{{x}}/{{y}}.pbf", self.tiles_base)
    }

    /// Run point tiles; `tile_version` is a pure cache buster.
    pub fn run_point_tiles(&self, run_id: &RunId, tile_version: u64) -> String {
        format!(
            "{}/api/ml/runs/{}/tiles/{{z}}/{{x}}/{{y}}.pbf?v={tile_version}",
            self.api_base,
            run_id.as_str()
        )
    }

    pub fn run_building_tiles(&self, run_id: &RunId, tile_version: u64) -> String {
        format!(
            "{}/api/ml/runs/{}/buildings/{{z}}/{{x}}/{{y}}.pbf?v={tile_version}",
            self.api_base,
            run_id.as_str()
        )
    }
}

/// A filter no feature can satisfy; highlight layers idle on this.
pub fn match_nothing(key: &str) -> Expr {
    Expr::eq_str(Expr::get(key), "")
}

/// The property a highlight layer matches its selected feature by.
pub fn highlight_key(layer: &str) -> &'static str {
    match layer {
        GBA_HIGHLIGHT => "gba_id",
        OSM_HIGHLIGHT => "osm_id",
        _ => "code",
    }
}

pub fn static_sources(endpoints: &TileEndpoints) -> Vec<SourceSpec> {
    vec![
        SourceSpec::new(INSAR_T44, endpoints.static_tiles(INSAR_T44)),
        SourceSpec::new(INSAR_T95, endpoints.static_tiles(INSAR_T95)),
        SourceSpec::new(GBA, endpoints.static_tiles(GBA)).with_max_zoom(15),
        SourceSpec::new(OSM, endpoints.static_tiles(OSM)).with_max_zoom(15),
    ]
}

/// The four static paint layers plus the four highlight layers, in z-order.
/// Highlights start on a match-nothing filter.
pub fn static_layers() -> Vec<LayerSpec> {
    let measurement = |id: &str| {
        LayerSpec::new(id, id, id, LayerKind::Circle)
            .with_paint("circle-radius", ramps::measurement_radius())
            .with_paint("circle-color", ramps::velocity_ramp())
            .with_paint("circle-opacity", Expr::literal(0.8))
    };
    let highlight = |id: &str, source: &str| {
        LayerSpec::new(id, source, source, LayerKind::Circle)
            .with_paint("circle-radius", Expr::literal(8.0))
            .with_paint("circle-color", Expr::literal("#ffffff"))
            .with_paint("circle-stroke-width", Expr::literal(2.0))
            .with_paint("circle-stroke-color", Expr::literal(HIGHLIGHT_COLOR))
            .with_filter(match_nothing("code"))
    };
    let outline = |id: &str, source: &str| {
        LayerSpec::new(id, source, source, LayerKind::Line)
            .with_paint("line-color", Expr::literal(HIGHLIGHT_COLOR))
            .with_paint("line-width", Expr::literal(2.0))
            .with_filter(match_nothing(highlight_key(id)))
    };

    vec![
        measurement(INSAR_T44),
        measurement(INSAR_T95),
        LayerSpec::new(GBA, GBA, GBA, LayerKind::FillExtrusion)
            .with_paint("fill-extrusion-height", Expr::get("height"))
            .with_paint("fill-extrusion-color", Expr::literal("#4aa5d5"))
            .with_paint("fill-extrusion-opacity", Expr::literal(0.6)),
        LayerSpec::new(OSM, OSM, OSM, LayerKind::Fill)
            .with_paint("fill-color", Expr::literal("#c9c6bf"))
            .with_paint("fill-opacity", Expr::literal(0.5)),
        highlight(INSAR_SELECTED_T44, INSAR_T44),
        highlight(INSAR_SELECTED_T95, INSAR_T95),
        outline(GBA_HIGHLIGHT, GBA),
        outline(OSM_HIGHLIGHT, OSM),
    ]
}

pub fn run_sources(endpoints: &TileEndpoints, run_id: &RunId, tile_version: u64) -> Vec<SourceSpec> {
    vec![
        SourceSpec::new(ML_POINTS, endpoints.run_point_tiles(run_id, tile_version)),
        SourceSpec::new(ML_BUILDINGS, endpoints.run_building_tiles(run_id, tile_version)),
    ]
}

/// Run-scoped layers in creation order (buildings under points).
/// Visibility reflects the run's show flags at creation time.
pub fn run_layers(run: &ActiveRun) -> Vec<LayerSpec> {
    let color_view = run.color_view;
    vec![
        LayerSpec::new(ML_BUILDINGS_FLAT, ML_BUILDINGS, ML_BUILDINGS, LayerKind::Fill)
            .with_paint("fill-color", ramps::building_ramp())
            .with_paint("fill-opacity", Expr::literal(0.35))
            .with_visible(run.show_buildings),
        LayerSpec::new(
            ML_BUILDINGS_FILL,
            ML_BUILDINGS,
            ML_BUILDINGS,
            LayerKind::FillExtrusion,
        )
        .with_paint("fill-extrusion-color", ramps::building_ramp())
        .with_paint("fill-extrusion-height", ramps::building_height())
        .with_paint("fill-extrusion-base", Expr::literal(0.0))
        .with_paint("fill-extrusion-opacity", Expr::literal(0.6))
        .with_visible(run.show_buildings),
        LayerSpec::new(
            ML_BUILDINGS_OUTLINE,
            ML_BUILDINGS,
            ML_BUILDINGS,
            LayerKind::Line,
        )
        .with_paint("line-color", ramps::building_ramp())
        .with_paint("line-opacity", Expr::literal(0.95))
        .with_paint("line-width", ramps::outline_width())
        .with_visible(run.show_buildings),
        LayerSpec::new(ML_POINTS, ML_POINTS, ML_POINTS, LayerKind::Circle)
            .with_paint("circle-radius", ramps::run_point_radius())
            .with_paint("circle-color", ramps::color_view_ramp(color_view))
            .with_paint("circle-opacity", Expr::literal(0.85))
            .with_paint("circle-stroke-width", Expr::literal(0.5))
            .with_paint("circle-stroke-color", Expr::literal("#ffffff"))
            .with_visible(run.show_points),
    ]
}

/// Run layer visibility is driven by two flags: points on one, buildings
/// on the other three.
pub fn run_layer_shows_points(layer: &str) -> bool {
    layer == ML_POINTS
}
