//! Request-path construction for the HTTP collaborator.
//!
//! Paths are relative to the API base; the caller owns transport. Path
//! components are percent-encoded.

use state::model::{BuildingSource, RunId, Track};

pub fn point_detail(code: &str, track: Option<Track>) -> String {
    format!(
        "/api/points/{}{}",
        encode_component(code),
        track_query(track)
    )
}

pub fn point_timeseries(code: &str, track: Option<Track>) -> String {
    format!(
        "/api/points/{}/timeseries{}",
        encode_component(code),
        track_query(track)
    )
}

pub fn building_detail(source: BuildingSource, id: &str) -> String {
    format!(
        "/api/buildings/{}/{}",
        source.as_str(),
        encode_component(id)
    )
}

pub fn building_points(source: BuildingSource, id: &str) -> String {
    format!(
        "/api/buildings/{}/{}/points",
        source.as_str(),
        encode_component(id)
    )
}

pub fn pipelines() -> String {
    "/api/ml/pipelines".to_string()
}

pub fn runs() -> String {
    "/api/ml/runs".to_string()
}

pub fn run_detail(run_id: &RunId) -> String {
    format!("/api/ml/runs/{}", encode_component(run_id.as_str()))
}

pub fn run_recolor(run_id: &RunId) -> String {
    format!("/api/ml/runs/{}/recolor", encode_component(run_id.as_str()))
}

pub fn run_delete(run_id: &RunId, force: bool) -> String {
    let query = if force { "?force=true" } else { "" };
    format!(
        "/api/ml/runs/{}{query}",
        encode_component(run_id.as_str())
    )
}

fn track_query(track: Option<Track>) -> String {
    match track {
        Some(t) => format!("?track={}", t.number()),
        None => String::new(),
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{building_points, point_detail, point_timeseries, run_delete, run_detail};
    use state::model::{BuildingSource, RunId, Track};

    #[test]
    fn point_paths_carry_the_optional_track() {
        assert_eq!(point_detail("P1", None), "/api/points/P1");
        assert_eq!(
            point_detail("P1", Some(Track::T95)),
            "/api/points/P1?track=95"
        );
        assert_eq!(
            point_timeseries("P1", Some(Track::T44)),
            "/api/points/P1/timeseries?track=44"
        );
    }

    #[test]
    fn components_are_percent_encoded() {
        assert_eq!(point_detail("a/b c", None), "/api/points/a%2Fb%20c");
        assert_eq!(
            building_points(BuildingSource::Osm, "way/123"),
            "/api/buildings/osm/way%2F123/points"
        );
    }

    #[test]
    fn run_paths() {
        let run = RunId::new("r-1");
        assert_eq!(run_detail(&run), "/api/ml/runs/r-1");
        assert_eq!(run_delete(&run, false), "/api/ml/runs/r-1");
        assert_eq!(run_delete(&run, true), "/api/ml/runs/r-1?force=true");
    }
}
