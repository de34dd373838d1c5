//! On-disk artifact fixtures matching what the training side produces.

use serde_json::{json, Map, Value};
use tempfile::TempDir;

pub const NUMERIC: [&str; 6] = [
    "danceability",
    "energy",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "valence",
];
pub const DECADES: [&str; 5] = ["1980", "1990", "2000", "2010", "2020"];

/// Rows qualifying for the canonical example query (popular, clean, 2010s).
pub const QUALIFYING_COUNT: usize = 12;

struct FixtureTrack {
    id: &'static str,
    artist: &'static str,
    title: &'static str,
    feats: [f64; 6],
    popular: bool,
    explicit: bool,
    decade: &'static str,
}

fn qualifying(id: &'static str, feats: [f64; 6]) -> FixtureTrack {
    FixtureTrack {
        id,
        artist: "Fixture Artist",
        title: "Fixture Title",
        feats,
        popular: true,
        explicit: false,
        decade: "2010",
    }
}

fn tracks() -> Vec<FixtureTrack> {
    let mut tracks = vec![
        qualifying("q01", [70.0, 60.0, 5.0, 10.0, 0.0, 80.0]),
        qualifying("q02", [72.0, 58.0, 6.0, 12.0, 1.0, 78.0]),
        qualifying("q03", [65.0, 65.0, 4.0, 8.0, 0.0, 85.0]),
        qualifying("q04", [80.0, 55.0, 8.0, 15.0, 2.0, 70.0]),
        qualifying("q05", [60.0, 70.0, 3.0, 5.0, 0.0, 90.0]),
        qualifying("q06", [75.0, 62.0, 5.0, 11.0, 0.0, 82.0]),
        qualifying("q07", [68.0, 59.0, 7.0, 9.0, 1.0, 79.0]),
        qualifying("q08", [71.0, 61.0, 5.0, 10.0, 0.0, 81.0]),
        qualifying("q09", [55.0, 45.0, 10.0, 30.0, 5.0, 60.0]),
        qualifying("q10", [90.0, 85.0, 12.0, 2.0, 0.0, 95.0]),
        qualifying("q11", [40.0, 40.0, 15.0, 50.0, 10.0, 45.0]),
        qualifying("q12", [30.0, 30.0, 20.0, 70.0, 40.0, 30.0]),
    ];
    tracks.push(FixtureTrack {
        popular: false,
        ..qualifying("unpopular", [70.0, 60.0, 5.0, 10.0, 0.0, 80.0])
    });
    tracks.push(FixtureTrack {
        explicit: true,
        ..qualifying("explicit", [70.0, 60.0, 5.0, 10.0, 0.0, 80.0])
    });
    tracks.push(FixtureTrack {
        decade: "1990",
        ..qualifying("nineties", [70.0, 60.0, 5.0, 10.0, 0.0, 80.0])
    });
    tracks.push(FixtureTrack {
        artist: "",
        ..qualifying("no-artist", [70.0, 60.0, 5.0, 10.0, 0.0, 80.0])
    });
    tracks
}

fn feature_order() -> Vec<String> {
    let mut order: Vec<String> = NUMERIC.iter().map(|s| s.to_string()).collect();
    order.push("is_popular".to_string());
    order.push("is_explicit".to_string());
    order.extend(DECADES.iter().map(|d| format!("decade_{d}")));
    order
}

// Fixture scaler: mean 50, std 25 on every numeric column.
fn scale(x: f64) -> f64 {
    (x - 50.0) / 25.0
}

fn vector(track: &FixtureTrack) -> Vec<f64> {
    let mut v: Vec<f64> = track.feats.iter().map(|x| scale(*x)).collect();
    v.push(if track.popular { 1.0 } else { 0.0 });
    v.push(if track.explicit { 1.0 } else { 0.0 });
    for d in DECADES {
        v.push(if d == track.decade { 1.0 } else { 0.0 });
    }
    v
}

fn row(track: &FixtureTrack) -> Value {
    let mut map = Map::new();
    map.insert("track_id".to_string(), json!(track.id));
    map.insert("artist".to_string(), json!(track.artist));
    map.insert("title".to_string(), json!(track.title));
    for (name, value) in NUMERIC.iter().zip(track.feats) {
        map.insert(name.to_string(), json!(value));
    }
    map.insert(
        "is_popular".to_string(),
        json!(if track.popular { 1.0 } else { 0.0 }),
    );
    map.insert(
        "is_explicit".to_string(),
        json!(if track.explicit { 1.0 } else { 0.0 }),
    );
    for d in DECADES {
        map.insert(
            format!("decade_{d}"),
            json!(if d == track.decade { 1.0 } else { 0.0 }),
        );
    }
    Value::Object(map)
}

/// Write a full, consistent artifact set into a fresh temp directory.
pub fn write_artifact_fixtures() -> TempDir {
    let dir = TempDir::new().unwrap();
    let tracks = tracks();
    let order = feature_order();

    let model = json!({
        "dim": order.len(),
        "vectors": tracks.iter().map(vector).collect::<Vec<_>>(),
    });
    let scaler = json!({
        "columns": NUMERIC,
        "mean": vec![50.0; 6],
        "std": vec![25.0; 6],
    });
    let dataset: Vec<Value> = tracks.iter().map(row).collect();

    std::fs::write(dir.path().join("model.json"), model.to_string()).unwrap();
    std::fs::write(dir.path().join("scaler.json"), scaler.to_string()).unwrap();
    std::fs::write(
        dir.path().join("features.json"),
        serde_json::to_string(&order).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("dataset.json"),
        serde_json::to_string(&dataset).unwrap(),
    )
    .unwrap();

    dir
}
