use scene::expr::{Feature, Value};
use scene::graph::SceneGraph;
use scene::spec::{RenderedFeature, ScreenPoint};

use crate::catalog::{
    GBA, INSAR_T44, INSAR_T95, ML_BUILDINGS_FILL, ML_BUILDINGS_FLAT, ML_BUILDINGS_OUTLINE,
    ML_POINTS, OSM,
};
use crate::hit::candidate_layers;

/// Structured tooltip content: a title and label/value rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Tooltip {
    fn new(title: &str, rows: Vec<(&str, String)>) -> Self {
        Self {
            title: title.to_string(),
            rows: rows
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        }
    }
}

/// Hover handler: same priority-ordered query as clicking, but it only
/// composes content and never touches the selection.
pub fn hover<S: SceneGraph + ?Sized>(engine: &S, point: ScreenPoint) -> Option<Tooltip> {
    let layers = candidate_layers(engine);
    let features = engine.query_rendered_features(point, &layers);
    compose(features.first()?)
}

/// Pure composition from one rendered hit; absent values render as "—".
pub fn compose(hit: &RenderedFeature) -> Option<Tooltip> {
    let props = &hit.feature;
    let tooltip = match hit.layer_id.as_str() {
        ML_BUILDINGS_OUTLINE => Tooltip::new(
            "Assigned Building",
            vec![
                ("Source", text(props, "building_source")),
                ("ID", text(props, "building_id")),
            ],
        ),
        ML_BUILDINGS_FILL | ML_BUILDINGS_FLAT => Tooltip::new(
            "ML Building",
            vec![
                ("Source", text(props, "building_source")),
                ("ID", text(props, "building_id")),
                ("Height", meters(props, "height_m")),
            ],
        ),
        ML_POINTS => Tooltip::new(
            "ML Result",
            vec![
                ("Cluster", text(props, "cluster_id")),
                ("Building", text(props, "building_id")),
                ("Method", text(props, "method")),
                ("Distance", meters(props, "distance_m")),
            ],
        ),
        INSAR_T44 | INSAR_T95 => Tooltip::new(
            "InSAR Point",
            vec![
                ("Code", text(props, "code")),
                ("Velocity", number(props, "velocity", 2, " mm/yr")),
                ("Coherence", number(props, "coherence", 2, "")),
            ],
        ),
        GBA => Tooltip::new("GBA Building", vec![("Height", number(props, "height", 1, " m"))]),
        OSM => Tooltip::new(
            "OSM Building",
            vec![
                ("Name", text(props, "name")),
                ("Type", text(props, "building_type")),
            ],
        ),
        _ => return None,
    };
    Some(tooltip)
}

const ABSENT: &str = "—";

fn text(props: &Feature, key: &str) -> String {
    match props.get(key) {
        Some(Value::Str(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.fract() == 0.0 => format!("{}", *n as i64),
        Some(Value::Number(n)) => format!("{n}"),
        _ => ABSENT.to_string(),
    }
}

fn number(props: &Feature, key: &str, decimals: usize, unit: &str) -> String {
    match props.get(key).and_then(Value::number) {
        Some(n) => format!("{n:.decimals$}{unit}"),
        None => ABSENT.to_string(),
    }
}

fn meters(props: &Feature, key: &str) -> String {
    number(props, key, 1, " m")
}

#[cfg(test)]
mod tests {
    use super::{compose, hover};
    use crate::adapter::MapAdapter;
    use crate::catalog::{INSAR_T44, ML_POINTS, TileEndpoints};
    use scene::expr::{Feature, Value};
    use scene::memory::MemoryScene;
    use scene::spec::{RenderedFeature, ScreenPoint};
    use state::model::{ActiveRun, RunId, ViewState};

    fn feature(pairs: &[(&str, Value)]) -> Feature {
        Feature::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn measurement_tooltip_formats_numbers() {
        let hit = RenderedFeature {
            layer_id: INSAR_T44.to_string(),
            feature: feature(&[
                ("code", Value::from("P1")),
                ("velocity", Value::Number(-3.456)),
                ("coherence", Value::Number(0.876)),
            ]),
        };
        let tooltip = compose(&hit).expect("tooltip");
        assert_eq!(tooltip.title, "InSAR Point");
        assert_eq!(
            tooltip.rows,
            vec![
                ("Code".to_string(), "P1".to_string()),
                ("Velocity".to_string(), "-3.46 mm/yr".to_string()),
                ("Coherence".to_string(), "0.88".to_string()),
            ]
        );
    }

    #[test]
    fn absent_values_render_as_dashes() {
        let hit = RenderedFeature {
            layer_id: ML_POINTS.to_string(),
            feature: feature(&[("cluster_id", Value::from("c3"))]),
        };
        let tooltip = compose(&hit).expect("tooltip");
        assert_eq!(tooltip.rows[0].1, "c3");
        assert_eq!(tooltip.rows[1].1, "—");
        assert_eq!(tooltip.rows[3].1, "—");
    }

    #[test]
    fn hover_uses_hit_priority_and_leaves_selection_alone() {
        let mut a = MapAdapter::new(
            MemoryScene::new(),
            TileEndpoints::new("http://t", "http://a"),
        );
        a.initialize(&ViewState::new()).unwrap();
        a.sync_active_run(&ActiveRun {
            run_id: Some(RunId::new("r1")),
            ..ActiveRun::default()
        })
        .unwrap();

        let engine = a.engine_mut();
        engine.place_feature(
            INSAR_T44,
            INSAR_T44,
            0.0,
            0.0,
            5.0,
            feature(&[("code", Value::from("P1"))]),
        );
        engine.place_feature(
            ML_POINTS,
            ML_POINTS,
            0.0,
            0.0,
            5.0,
            feature(&[("cluster_id", Value::from("c1"))]),
        );

        let tooltip = hover(a.engine(), ScreenPoint::new(0.0, 0.0)).expect("tooltip");
        assert_eq!(tooltip.title, "ML Result");

        assert!(hover(a.engine(), ScreenPoint::new(400.0, 400.0)).is_none());
    }
}
