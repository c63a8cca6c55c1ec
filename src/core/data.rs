//! Shared loader for the RON data directories under `assets/data/`.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;

/// Parse a single RON document. `path` is only used for error reporting.
pub fn parse_ron<T: DeserializeOwned>(path: &str, contents: &str) -> Result<T, DataLoadError> {
    ron::from_str::<T>(contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

/// Read and parse one RON file.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(label));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&label, &contents)
}

/// Load every `*.ron` file in `dir`, keyed by file stem.
///
/// A broken file is logged and skipped so one typo does not take the whole
/// catalog down. Only a missing or unreadable directory is an error.
pub fn load_ron_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<(String, T)>, DataLoadError> {
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(dir.display().to_string()));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: dir.display().to_string(),
        details: e.to_string(),
    })?;

    let mut loaded = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        match load_ron_file::<T>(&path) {
            Ok(value) => loaded.push((key, value)),
            Err(e) => error!("{}", e),
        }
    }

    // Directory iteration order is platform dependent
    loaded.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Sample {
        name: String,
        value: f32,
    }

    #[test]
    fn test_parse_ron_reads_struct() {
        let sample: Sample = parse_ron("inline", r#"(name: "ember", value: 2.5)"#).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "ember".to_string(),
                value: 2.5
            }
        );
    }

    #[test]
    fn test_parse_ron_reports_path_on_error() {
        let err = parse_ron::<Sample>("spells/broken.ron", "(name: )").unwrap_err();
        match err {
            DataLoadError::ParseError { path, .. } => assert_eq!(path, "spells/broken.ron"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_ron_dir_missing_directory() {
        let result = load_ron_dir::<Sample>(Path::new("does/not/exist"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound(_))));
    }
}
