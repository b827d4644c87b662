use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::gradebook::tools::config::FileRule;
use crate::gradebook::tools::error::{Result, ToolError};

/// Extensions recognised as spreadsheets, compared case-insensitively.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Lists the spreadsheets directly inside `dir`, sorted by file name so that
/// repeated runs visit files in the same order.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ToolError::MissingInput(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_spreadsheet(&path) {
            files.push(path);
        }
    }
    files.sort_by_key(|path| file_name(path));

    info!(count = files.len(), dir = %dir.display(), "discovered data files");
    for (index, path) in files.iter().enumerate() {
        info!(index = index + 1, file = %file_name(path), "data file");
    }
    Ok(files)
}

/// Returns the files accepted by `rule`, keeping discovery order.
pub fn select(files: &[PathBuf], rule: &FileRule) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|path| matches_rule(path, rule))
        .cloned()
        .collect()
}

/// Checks the marker against the file name and, when the rule requires one,
/// the extension.
pub fn matches_rule(path: &Path, rule: &FileRule) -> bool {
    if !file_name(path).contains(&rule.marker) {
        return false;
    }
    match &rule.extension {
        Some(required) => extension(path).is_some_and(|ext| ext == *required),
        None => is_spreadsheet(path),
    }
}

pub fn is_spreadsheet(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
}

/// File name without directories, lossily decoded.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without its final extension. Used as the column label of a
/// per-file score category.
pub fn category_key(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
