//! Raw sample sources

use std::path::{Path, PathBuf};

/// Raw per-sample input handed to `create`
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Image file path
    Path(PathBuf),
    /// Raw string: label, scalar literal, text sample or `path;start:stop`
    Text(String),
    /// Numeric sequence
    Values(Vec<f64>),
}

impl Source {
    /// Short identifier used in error reports
    pub fn describe(&self) -> String {
        match self {
            Source::Path(p) => p.display().to_string(),
            Source::Text(s) if s.chars().count() > 64 => {
                let head: String = s.chars().take(61).collect();
                format!("{}...", head)
            }
            Source::Text(s) => s.clone(),
            Source::Values(v) => format!("[{} values]", v.len()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Source::Text(s) => Some(s.as_str()),
            Source::Path(p) => p.to_str(),
            Source::Values(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Source::Path(p) => Some(p.as_path()),
            Source::Text(s) => Some(Path::new(s)),
            Source::Values(_) => None,
        }
    }

    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            Source::Values(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Text(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Text(s)
    }
}

impl From<PathBuf> for Source {
    fn from(p: PathBuf) -> Self {
        Source::Path(p)
    }
}

impl From<Vec<f64>> for Source {
    fn from(v: Vec<f64>) -> Self {
        Source::Values(v)
    }
}

impl From<&[f64]> for Source {
    fn from(v: &[f64]) -> Self {
        Source::Values(v.to_vec())
    }
}
