//! Resolving and opening the study a command works on

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::config::Config;
use crate::core::discovery::find_latest_study;
use crate::core::error::StudyError;
use crate::core::loader::load_study;
use crate::core::study::StudyTable;

/// Pick the study file: explicit flag, then config/env, then newest in `dir`
pub fn resolve_study_path(
    file: Option<&Path>,
    dir: Option<&Path>,
    config: &Config,
) -> Result<PathBuf, StudyError> {
    if let Some(file) = file {
        return Ok(file.to_path_buf());
    }
    if let Some(file) = &config.study_file {
        debug!(file = %file.display(), "study file from config");
        return Ok(file.clone());
    }

    let search = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    find_latest_study(&search, config.file_prefix())
}

/// Resolve and load the study; `sheet` overrides the configured sheet
pub fn open_study(
    file: Option<&Path>,
    dir: Option<&Path>,
    sheet: Option<&str>,
    config: &Config,
) -> Result<StudyTable, StudyError> {
    let path = resolve_study_path(file, dir, config)?;
    load_study(&path, sheet.unwrap_or_else(|| config.sheet()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_file_wins() {
        let config = Config {
            study_file: Some(PathBuf::from("from_config.xlsx")),
            ..Config::default()
        };
        let path = resolve_study_path(Some(Path::new("flag.csv")), None, &config).unwrap();
        assert_eq!(path, PathBuf::from("flag.csv"));
    }

    #[test]
    fn test_config_file_before_discovery() {
        let config = Config {
            study_file: Some(PathBuf::from("from_config.xlsx")),
            ..Config::default()
        };
        let path = resolve_study_path(None, Some(Path::new("/nonexistent")), &config).unwrap();
        assert_eq!(path, PathBuf::from("from_config.xlsx"));
    }

    #[test]
    fn test_discovery_in_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("MV_Material_Study-2024.xlsx"), b"").unwrap();
        let path = resolve_study_path(None, Some(dir.path()), &Config::default()).unwrap();
        assert!(path.ends_with("MV_Material_Study-2024.xlsx"));
    }

    #[test]
    fn test_open_csv_study() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("study.csv");
        fs::write(
            &file,
            "SEC order,item,req_qty,allocated_qty,balance,supply_type\nP1,A,5,5,0,inventory\n",
        )
        .unwrap();
        let table = open_study(Some(&file), None, None, &Config::default()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
