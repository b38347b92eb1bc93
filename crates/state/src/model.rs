use serde::{Deserialize, Serialize};

use foundation::bounds::LonLatBounds;

/// Satellite viewing geometry. Two tracks cover the same ground area with
/// independent measurement layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Ascending, track number 44.
    T44,
    /// Descending, track number 95.
    T95,
}

impl Track {
    pub fn number(self) -> u16 {
        match self {
            Track::T44 => 44,
            Track::T95 => 95,
        }
    }

    pub fn from_number(n: u16) -> Option<Self> {
        match n {
            44 => Some(Track::T44),
            95 => Some(Track::T95),
            _ => None,
        }
    }
}

/// Building footprint source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingSource {
    Gba,
    Osm,
}

impl BuildingSource {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildingSource::Gba => "gba",
            BuildingSource::Osm => "osm",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "gba" => Some(BuildingSource::Gba),
            "osm" => Some(BuildingSource::Osm),
            _ => None,
        }
    }
}

/// The active selection. `None` at the store level means no selection.
///
/// A point selection without a track refers to the code on both tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    Point {
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        track: Option<Track>,
    },
    Building {
        source: BuildingSource,
        id: String,
    },
}

impl Selection {
    pub fn point(code: impl Into<String>, track: Option<Track>) -> Self {
        Selection::Point {
            code: code.into(),
            track,
        }
    }

    pub fn building(source: BuildingSource, id: impl Into<String>) -> Self {
        Selection::Building {
            source,
            id: id.into(),
        }
    }
}

/// Per-layer visibility toggles. The four fields are independent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub track_44: bool,
    pub track_95: bool,
    pub gba: bool,
    pub osm: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            track_44: true,
            track_95: true,
            gba: false,
            osm: false,
        }
    }
}

/// Numeric measurement filters.
///
/// Bounds are not validated against each other: `velocity_min >
/// velocity_max` is legal and simply matches nothing once applied.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub velocity_min: f64,
    pub velocity_max: f64,
    pub coherence_min: f64,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            velocity_min: -10.0,
            velocity_max: 10.0,
            coherence_min: 0.6,
        }
    }
}

/// Which per-point encoding the run point layer is colored by.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorView {
    #[default]
    Cluster,
    Building,
    Assignment,
    Distance,
    Velocity,
    Coherence,
}

impl ColorView {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorView::Cluster => "cluster",
            ColorView::Building => "building",
            ColorView::Assignment => "assignment",
            ColorView::Distance => "distance",
            ColorView::Velocity => "velocity",
            ColorView::Coherence => "coherence",
        }
    }
}

/// Opaque analysis-run identifier (UUID on the wire).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// View options for the active analysis run.
///
/// `tile_version` only increments on explicit refresh requests; it is
/// embedded in tile URLs to defeat caching and carries no other meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRun {
    pub run_id: Option<RunId>,
    pub show_points: bool,
    pub show_buildings: bool,
    pub color_view: ColorView,
    pub tile_version: u64,
}

impl Default for ActiveRun {
    fn default() -> Self {
        Self {
            run_id: None,
            show_points: true,
            show_buildings: true,
            color_view: ColorView::default(),
            tile_version: 0,
        }
    }
}

/// The full declarative view state, one mutable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub layers: LayerVisibility,
    pub filters: Filters,
    pub filters_enabled: bool,
    pub selection: Option<Selection>,
    pub active_run: ActiveRun,
    /// `None` until the map has completed its first load.
    pub viewport: Option<LonLatBounds>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            filters_enabled: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildingSource, ColorView, Filters, LayerVisibility, Track, ViewState};

    #[test]
    fn track_numbers_round_trip() {
        assert_eq!(Track::from_number(44), Some(Track::T44));
        assert_eq!(Track::from_number(95), Some(Track::T95));
        assert_eq!(Track::from_number(7), None);
        assert_eq!(Track::T95.number(), 95);
    }

    #[test]
    fn building_source_wire_names() {
        assert_eq!(BuildingSource::Gba.as_str(), "gba");
        assert_eq!(BuildingSource::from_str("osm"), Some(BuildingSource::Osm));
        assert_eq!(BuildingSource::from_str("OSM"), None);
    }

    #[test]
    fn color_view_wire_names() {
        assert_eq!(ColorView::default(), ColorView::Cluster);
        assert_eq!(ColorView::Assignment.as_str(), "assignment");
        assert_eq!(ColorView::Coherence.as_str(), "coherence");
    }

    #[test]
    fn defaults_match_initial_view() {
        let s = ViewState::new();
        assert_eq!(
            s.layers,
            LayerVisibility {
                track_44: true,
                track_95: true,
                gba: false,
                osm: false,
            }
        );
        assert_eq!(
            s.filters,
            Filters {
                velocity_min: -10.0,
                velocity_max: 10.0,
                coherence_min: 0.6,
            }
        );
        assert!(s.filters_enabled);
        assert!(s.selection.is_none());
        assert!(s.active_run.run_id.is_none());
        assert!(s.active_run.show_points);
        assert!(s.active_run.show_buildings);
        assert_eq!(s.active_run.color_view, ColorView::Cluster);
        assert_eq!(s.active_run.tile_version, 0);
        assert!(s.viewport.is_none());
    }
}
