//! JSON persistence of tracks and analysis results.

use crate::workflow::runner::Analysis;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use trackcore::math::FeatureMatrix;
use trackcore::Track;

pub fn load_track<P: AsRef<Path>>(path: P) -> anyhow::Result<Track> {
    let path_ref = path.as_ref();
    let contents =
        fs::read_to_string(path_ref).with_context(|| format!("reading track {}", path_ref.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing track {}", path_ref.display()))
}

pub fn save_track<P: AsRef<Path>>(path: P, track: &Track) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string(track).context("serializing track")?;
    fs::write(path_ref, json).with_context(|| format!("writing track {}", path_ref.display()))
}

/// Every `*.json` file directly under `dir`, in file-name order.
pub fn track_files<P: AsRef<Path>>(dir: P) -> anyhow::Result<Vec<PathBuf>> {
    let dir_ref = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir_ref).with_context(|| format!("listing {}", dir_ref.display()))? {
        let path = entry
            .with_context(|| format!("reading entry in {}", dir_ref.display()))?
            .path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Writes `tracks` as `<prefix>_NNN.json` and returns the paths.
pub fn save_tracks<P: AsRef<Path>>(dir: P, prefix: &str, tracks: &[Track]) -> anyhow::Result<Vec<PathBuf>> {
    let dir_ref = dir.as_ref();
    fs::create_dir_all(dir_ref).with_context(|| format!("creating {}", dir_ref.display()))?;
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let path = dir_ref.join(format!("{}_{:03}.json", prefix, i));
            save_track(&path, track)?;
            Ok(path)
        })
        .collect()
}

pub fn save_results<P: AsRef<Path>>(path: P, results: &[Analysis]) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(results).context("serializing analysis results")?;
    fs::write(path_ref, json).with_context(|| format!("writing results {}", path_ref.display()))
}

/// Writes a standardized scalar-feature matrix as `{names, rows}` JSON.
pub fn save_feature_matrix<P: AsRef<Path>>(path: P, matrix: &FeatureMatrix) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let rows: Vec<Vec<f64>> = matrix.values.outer_iter().map(|row| row.to_vec()).collect();
    let json = serde_json::to_string_pretty(&serde_json::json!({
        "names": matrix.names,
        "rows": rows,
    }))
    .context("serializing feature matrix")?;
    fs::write(path_ref, json).with_context(|| format!("writing feature matrix {}", path_ref.display()))
}

pub fn write_report<P: AsRef<Path>>(dir: P, name: &str, report: &str) -> anyhow::Result<PathBuf> {
    let dir_ref = dir.as_ref();
    fs::create_dir_all(dir_ref).with_context(|| format!("creating {}", dir_ref.display()))?;
    let path = dir_ref.join(format!("{}_report.txt", name));
    fs::write(&path, report).with_context(|| format!("writing report {}", path.display()))?;
    Ok(path)
}
