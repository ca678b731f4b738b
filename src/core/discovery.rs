//! Locating the newest Material Study file in a directory

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::core::error::StudyError;

/// Find the most recently modified study workbook in `dir`
///
/// Files named `<prefix>*.xlsx` win; when there are none, any `.xlsx` whose
/// name mentions "material" or "study" is considered.
pub fn find_latest_study(dir: &Path, prefix: &str) -> Result<PathBuf, StudyError> {
    let workbooks = list_workbooks(dir);

    let mut candidates: Vec<&(PathBuf, SystemTime)> = workbooks
        .iter()
        .filter(|(p, _)| file_name(p).starts_with(prefix))
        .collect();

    if candidates.is_empty() {
        candidates = workbooks
            .iter()
            .filter(|(p, _)| {
                let name = file_name(p);
                ["Material", "material", "Study", "study"]
                    .iter()
                    .any(|needle| name.contains(needle))
            })
            .collect();
    }

    match candidates.into_iter().max_by_key(|(_, modified)| *modified) {
        Some((path, _)) => {
            debug!(file = %path.display(), "auto-detected study file");
            Ok(path.clone())
        }
        None => {
            let available: Vec<String> = workbooks.iter().map(|(p, _)| file_name(p)).collect();
            let help = if available.is_empty() {
                Some(format!(
                    "Expected a workbook named {}*.xlsx with a 'Study' sheet; pass one with --file",
                    prefix
                ))
            } else {
                Some(format!(
                    "Available Excel files: {}. Pass one with --file",
                    available.join(", ")
                ))
            };
            Err(StudyError::NoStudyFile {
                dir: dir.to_path_buf(),
                help,
            })
        }
    }
}

fn list_workbooks(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| x.eq_ignore_ascii_case("xlsx"))
        })
        // Skip Excel lock files
        .filter(|e| !e.file_name().to_string_lossy().starts_with("~$"))
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().ok()?;
            Some((e.into_path(), modified))
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
