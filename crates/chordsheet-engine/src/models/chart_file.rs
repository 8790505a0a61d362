use relative_path::{RelativePath, RelativePathBuf};

use crate::io::CHART_EXTENSIONS;

/// A chart file under the charts root, with display-friendly names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    relative_path: RelativePathBuf,
    display_name: String,
    display_path: String,
}

impl ChartFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = relative_path
            .file_name()
            .map(strip_chart_extension)
            .unwrap_or_else(|| "Untitled".to_string());
        let display_path = strip_chart_extension(relative_path.as_str());

        Self {
            relative_path,
            display_name,
            display_path,
        }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without its chart extension.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path without the chart extension, for window titles.
    pub fn display_path(&self) -> &str {
        &self.display_path
    }
}

fn strip_chart_extension(name: &str) -> String {
    for ext in CHART_EXTENSIONS {
        if let Some(stem) = name.strip_suffix(ext)
            && let Some(stem) = stem.strip_suffix('.')
        {
            return stem.to_string();
        }
    }
    name.to_string()
}

impl From<RelativePathBuf> for ChartFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}
