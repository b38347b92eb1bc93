//! Wire shapes for the external collaborators: detail/timeseries fetches
//! and the analysis-run lifecycle. Transport stays elsewhere; these types
//! only define what crosses the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use foundation::bounds::LonLatBounds;
use state::model::{BuildingSource, RunId};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPoint {
    pub lon: f64,
    pub lat: f64,
}

/// Full per-point record; optional fields are simply absent for points the
/// processing chain could not derive them for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    pub code: String,
    pub track: u16,
    /// Line-of-sight direction label for the track.
    pub los: String,
    pub velocity: f64,
    #[serde(default)]
    pub velocity_std: Option<f64>,
    #[serde(default)]
    pub coherence: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub height_std: Option<f64>,
    #[serde(default)]
    pub acceleration: Option<f64>,
    #[serde(default)]
    pub acceleration_std: Option<f64>,
    #[serde(default)]
    pub season_amp: Option<f64>,
    #[serde(default)]
    pub season_phs: Option<f64>,
    #[serde(default)]
    pub incidence_angle: Option<f64>,
    #[serde(default)]
    pub amp_mean: Option<f64>,
    #[serde(default)]
    pub amp_std: Option<f64>,
    pub geometry: GeometryPoint,
    #[serde(default)]
    pub gba_id: Option<String>,
    #[serde(default)]
    pub osm_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesSample {
    /// ISO-8601 date.
    pub date: String,
    /// Displacement in millimeters along the track's line of sight.
    pub displacement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeseries {
    pub code: String,
    pub track: u16,
    pub measurements: Vec<TimeseriesSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDetail {
    pub id: String,
    pub source: BuildingSource,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
    /// GeoJSON geometry, passed through opaquely.
    pub geometry: Json,
    #[serde(default)]
    pub attributes: BTreeMap<String, Json>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingPoints {
    pub count: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    /// Terminal states stop polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Assignment,
    Clustering,
    Hybrid,
}

impl PipelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::Assignment => "assignment",
            PipelineKind::Clustering => "clustering",
            PipelineKind::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub status: RunStatus,
    pub pipeline: PipelineKind,
    pub run_type: String,
    pub created_at: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub source: Option<BuildingSource>,
    #[serde(default)]
    pub track: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    #[serde(flatten)]
    pub summary: RunSummary,
    #[serde(default)]
    pub params: BTreeMap<String, Json>,
    #[serde(default)]
    pub mlflow_run_id: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Numeric pipeline parameters; defaults mirror the launch form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub max_distance_m: f64,
    pub buffer_multiplier: f64,
    pub min_buffer_m: f64,
    pub default_height_m: f64,
    pub eps: f64,
    pub min_samples: u32,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_distance_m: 30.0,
            buffer_multiplier: 1.0,
            min_buffer_m: 3.0,
            default_height_m: 12.0,
            eps: 0.9,
            min_samples: 8,
        }
    }
}

/// Run creation payload. `source` is absent for pure clustering; `track`
/// absent means both tracks; `bbox` is the current viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRun {
    pub pipeline: PipelineKind,
    pub source: Option<BuildingSource>,
    pub track: Option<u16>,
    pub bbox: [f64; 4],
    pub params: RunParams,
}

impl CreateRun {
    pub fn new(pipeline: PipelineKind, viewport: LonLatBounds) -> Self {
        Self {
            pipeline,
            source: if pipeline == PipelineKind::Clustering {
                None
            } else {
                Some(BuildingSource::Gba)
            },
            track: None,
            bbox: viewport.to_array(),
            params: RunParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDeleted {
    pub run_id: RunId,
    pub db_deleted: bool,
    pub mlflow_deleted: bool,
    #[serde(default)]
    pub mlflow_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecolored {
    pub run_id: RunId,
    /// Number of buildings that received a palette index.
    pub building_colors: u64,
}

/// Pipeline names, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipelines {
    pub pipelines: Vec<String>,
}
