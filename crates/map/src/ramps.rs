//! Color ramps and sizing ramps as engine expressions.
//!
//! Every ramp is a data-driven table evaluated by the rendering engine;
//! nothing here is computed per feature host-side.

use foundation::color::{NEUTRAL, categorical_palette};
use scene::expr::{Expr, Value};
use state::model::ColorView;

/// Velocity step ramp (mm/yr); negative is subsidence, positive uplift.
pub fn velocity_ramp() -> Expr {
    Expr::step(
        Expr::get("velocity"),
        "#8e0f2f",
        vec![
            (-5.0, Value::from("#c6372a")),
            (-2.0, Value::from("#e67f1c")),
            (-1.0, Value::from("#f2c14e")),
            (1.0, Value::from("#2c9f7a")),
            (2.0, Value::from("#4aa5d5")),
            (5.0, Value::from("#345995")),
            (10.0, Value::from("#1c2f4a")),
        ],
    )
}

/// Coherence quality ramp: red at 0.2, yellow at 0.6, green at 1.0.
pub fn coherence_ramp() -> Expr {
    Expr::interpolate_linear(
        Expr::coalesce(vec![Expr::get("coherence"), Expr::literal(0.0)]),
        vec![
            (0.2, Value::from("#c6372a")),
            (0.6, Value::from("#f2c14e")),
            (1.0, Value::from("#1b9e77")),
        ],
    )
}

/// Assignment distance ramp in meters.
pub fn distance_ramp() -> Expr {
    Expr::interpolate_linear(
        Expr::coalesce(vec![Expr::get("distance_m"), Expr::literal(0.0)]),
        vec![
            (0.0, Value::from("#1b9e77")),
            (10.0, Value::from("#66a61e")),
            (20.0, Value::from("#e6ab02")),
            (30.0, Value::from("#d95f02")),
            (50.0, Value::from("#a6761d")),
        ],
    )
}

/// Assignment-method categorical ramp.
pub fn assignment_ramp() -> Expr {
    Expr::match_table(
        Expr::get("method"),
        vec![
            (Value::from("buffer"), Value::from("#1b9e77")),
            (Value::from("nearest"), Value::from("#d95f02")),
            (Value::from("unassigned"), Value::from("#999999")),
            (Value::from("dbscan"), Value::from("#7570b3")),
        ],
        NEUTRAL,
    )
}

/// Cluster-id categorical ramp over the wheel palette.
pub fn cluster_ramp() -> Expr {
    categorical("cluster_color_index")
}

/// Building-id categorical ramp over the wheel palette.
pub fn building_ramp() -> Expr {
    categorical("building_color_index")
}

fn categorical(key: &str) -> Expr {
    let cases = categorical_palette()
        .iter()
        .enumerate()
        .map(|(i, color)| (Value::Number(i as f64), Value::from(color.as_str())))
        .collect();
    Expr::match_table(Expr::get(key), cases, NEUTRAL)
}

/// Extrusion height in meters: reported height, else 12, never below 4.
pub fn building_height() -> Expr {
    Expr::max(vec![
        Expr::coalesce(vec![Expr::get("height_m"), Expr::literal(12.0)]),
        Expr::literal(4.0),
    ])
}

/// Circle radius for the static measurement layers.
pub fn measurement_radius() -> Expr {
    Expr::interpolate_linear(
        Expr::Zoom,
        vec![
            (8.0, Value::Number(1.5)),
            (12.0, Value::Number(2.5)),
            (14.0, Value::Number(4.0)),
            (16.0, Value::Number(6.0)),
        ],
    )
}

/// Circle radius for run points; denser than the static ramp.
pub fn run_point_radius() -> Expr {
    Expr::interpolate_linear(
        Expr::Zoom,
        vec![
            (8.0, Value::Number(2.0)),
            (12.0, Value::Number(3.0)),
            (14.0, Value::Number(5.0)),
            (16.0, Value::Number(7.0)),
            (20.0, Value::Number(9.0)),
            (22.0, Value::Number(10.0)),
        ],
    )
}

/// Line width for run building outlines.
pub fn outline_width() -> Expr {
    Expr::interpolate_linear(
        Expr::Zoom,
        vec![
            (10.0, Value::Number(1.6)),
            (14.0, Value::Number(2.6)),
            (18.0, Value::Number(3.4)),
        ],
    )
}

/// The ramp the run point layer is colored by for a given view.
pub fn color_view_ramp(view: ColorView) -> Expr {
    match view {
        ColorView::Cluster => cluster_ramp(),
        ColorView::Building => building_ramp(),
        ColorView::Assignment => assignment_ramp(),
        ColorView::Distance => distance_ramp(),
        ColorView::Velocity => velocity_ramp(),
        ColorView::Coherence => coherence_ramp(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        building_height, cluster_ramp, coherence_ramp, distance_ramp, velocity_ramp,
    };
    use foundation::color::NEUTRAL;
    use scene::expr::{Feature, Value, eval};

    fn feature(key: &str, v: Value) -> Feature {
        Feature::new(vec![(key.to_string(), v)])
    }

    #[test]
    fn velocity_breakpoints() {
        let ramp = velocity_ramp();
        let at = |v: f64| eval(&ramp, &feature("velocity", Value::Number(v)), 12.0);
        assert_eq!(at(-8.0), Value::from("#8e0f2f"));
        assert_eq!(at(-5.0), Value::from("#c6372a"));
        assert_eq!(at(-1.5), Value::from("#e67f1c"));
        assert_eq!(at(0.0), Value::from("#f2c14e"));
        assert_eq!(at(1.0), Value::from("#2c9f7a"));
        assert_eq!(at(3.0), Value::from("#4aa5d5"));
        assert_eq!(at(7.0), Value::from("#345995"));
        assert_eq!(at(25.0), Value::from("#1c2f4a"));
    }

    #[test]
    fn coherence_endpoints_and_missing_value() {
        let ramp = coherence_ramp();
        assert_eq!(
            eval(&ramp, &feature("coherence", Value::Number(1.0)), 12.0),
            Value::from("#1b9e77")
        );
        assert_eq!(
            eval(&ramp, &feature("coherence", Value::Number(0.6)), 12.0),
            Value::from("#f2c14e")
        );
        // Missing coherence coalesces to 0, clamped to the lowest stop.
        assert_eq!(
            eval(&ramp, &Feature::default(), 12.0),
            Value::from("#c6372a")
        );
    }

    #[test]
    fn distance_anchor_colors() {
        let ramp = distance_ramp();
        let at = |d: f64| eval(&ramp, &feature("distance_m", Value::Number(d)), 12.0);
        assert_eq!(at(0.0), Value::from("#1b9e77"));
        assert_eq!(at(30.0), Value::from("#d95f02"));
        assert_eq!(at(99.0), Value::from("#a6761d"));
    }

    #[test]
    fn cluster_ramp_wraps_and_defaults() {
        let ramp = cluster_ramp();
        let at = |i: f64| eval(&ramp, &feature("cluster_color_index", Value::Number(i)), 12.0);
        assert_ne!(at(0.0), at(1.0));
        // Indices outside the palette fall back to neutral; the tile
        // producer wraps before encoding.
        assert_eq!(at(60.0), Value::from(NEUTRAL));
        assert_eq!(eval(&ramp, &Feature::default(), 12.0), Value::from(NEUTRAL));
    }

    #[test]
    fn building_height_floor_and_default() {
        let h = building_height();
        assert_eq!(eval(&h, &Feature::default(), 12.0), Value::Number(12.0));
        assert_eq!(
            eval(&h, &feature("height_m", Value::Number(2.0)), 12.0),
            Value::Number(4.0)
        );
        assert_eq!(
            eval(&h, &feature("height_m", Value::Number(30.0)), 12.0),
            Value::Number(30.0)
        );
    }
}
