use scene::expr::Value;
use scene::graph::SceneGraph;
use scene::spec::{RenderedFeature, ScreenPoint};
use state::model::{BuildingSource, Selection, Track};
use state::store::Store;

use crate::catalog::{
    GBA, INSAR_T44, INSAR_T95, ML_BUILDINGS_FILL, ML_BUILDINGS_FLAT, ML_BUILDINGS_OUTLINE,
    ML_POINTS, OSM,
};

/// Query order for the static layers: measurement tracks, then buildings.
pub const STATIC_QUERY_ORDER: [&str; 4] = [INSAR_T44, INSAR_T95, GBA, OSM];

/// Query order for run-scoped layers, ahead of everything static.
pub const RUN_QUERY_ORDER: [&str; 4] = [
    ML_BUILDINGS_OUTLINE,
    ML_BUILDINGS_FILL,
    ML_BUILDINGS_FLAT,
    ML_POINTS,
];

/// Builds the priority-ordered candidate list for a pointer query.
///
/// Ordering contract: run layers (while materialized) come before the
/// static layers; among the static layers, tracks come before buildings.
/// This order decides which entity wins on overlap; it is behavior, not
/// an implementation detail.
pub fn candidate_layers<S: SceneGraph + ?Sized>(engine: &S) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::with_capacity(8);
    for id in RUN_QUERY_ORDER {
        if engine.has_layer(id) {
            out.push(id);
        }
    }
    out.extend(STATIC_QUERY_ORDER);
    out
}

/// Decodes the feature of one rendered hit into a typed selection.
///
/// Per-layer dispatch; a feature missing its identifying properties
/// decodes to `None` (no usable selection).
pub fn decode(hit: &RenderedFeature) -> Option<Selection> {
    let props = &hit.feature;
    match hit.layer_id.as_str() {
        ML_BUILDINGS_OUTLINE | ML_BUILDINGS_FILL | ML_BUILDINGS_FLAT => {
            let source = props
                .get("building_source")
                .and_then(Value::as_str)
                .and_then(BuildingSource::from_str)?;
            let id = props.get("building_id").and_then(id_string)?;
            Some(Selection::building(source, id))
        }
        ML_POINTS => {
            let code = props.get("code").and_then(Value::as_str)?;
            let track = props
                .get("track")
                .and_then(Value::number)
                .and_then(|n| Track::from_number(n as u16));
            Some(Selection::point(code, track))
        }
        INSAR_T44 => {
            let code = props.get("code").and_then(Value::as_str)?;
            Some(Selection::point(code, Some(Track::T44)))
        }
        INSAR_T95 => {
            let code = props.get("code").and_then(Value::as_str)?;
            Some(Selection::point(code, Some(Track::T95)))
        }
        GBA => {
            let id = props.get("gba_id").and_then(id_string)?;
            Some(Selection::building(BuildingSource::Gba, id))
        }
        OSM => {
            let id = props.get("osm_id").and_then(id_string)?;
            Some(Selection::building(BuildingSource::Osm, id))
        }
        _ => None,
    }
}

/// Resolves a pointer position to a selection; first hit wins.
///
/// `None` means either no candidate feature under the pointer or a first
/// feature with no usable identity; both behave as "nothing matched".
pub fn hit_test<S: SceneGraph + ?Sized>(engine: &S, point: ScreenPoint) -> Option<Selection> {
    let layers = candidate_layers(engine);
    let features = engine.query_rendered_features(point, &layers);
    decode(features.first()?)
}

/// Click handler: writes the resolved selection into the store, clearing
/// it when nothing decodes.
pub fn handle_click<S: SceneGraph + ?Sized>(engine: &S, point: ScreenPoint, store: &mut Store) {
    store.set_selection(hit_test(engine, point));
}

/// Feature ids arrive as strings or numbers depending on the source;
/// integral numbers format without a fraction.
fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::Str(s) => Some(s.clone()),
        Value::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        Value::Number(n) => Some(format!("{n}")),
        _ => None,
    }
}
