use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ChartFile;

/// File extensions treated as chord charts.
pub const CHART_EXTENSIONS: [&str; 3] = ["cho", "crd", "chordpro"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid charts directory: {0}")]
    InvalidChartsDir(String),
}

/// Read a chart file and return its content.
pub fn read_file(relative_path: &RelativePath, charts_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(charts_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write content to a chart file, creating parent directories as needed.
/// This is the host's save path; `content` should be the exact buffer text
/// or canonical serialization the engine handed over.
pub fn write_file(
    relative_path: &RelativePath,
    charts_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(charts_root);
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }
    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Scan for chart files under the charts directory, sorted by path.
pub fn scan_chart_files(charts_root: &Path) -> Result<Vec<ChartFile>, IoError> {
    if !charts_root.exists() {
        return Err(IoError::InvalidChartsDir(
            "charts directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(charts_root, &mut files)?;
    files.sort();

    Ok(files
        .iter()
        .filter_map(|path| {
            let rel = path.strip_prefix(charts_root).ok()?;
            let rel = RelativePath::from_path(rel).ok()?;
            Some(ChartFile::new(rel.to_relative_path_buf()))
        })
        .collect())
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && CHART_EXTENSIONS.iter().any(|e| ext == *e)
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_charts_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidChartsDir(
            "Directory does not exist".to_string(),
        ));
    }
    Ok(())
}
