//! Modality tags

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of raw input, selecting the builder that handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Image,
    Text,
    Audio,
    Raw,
    Timeseries,
    Classification,
    /// Behaves exactly like Classification
    Categorical,
    Segmentation,
    Regression,
    Depth,
    Trend,
}

impl Modality {
    pub const ALL: [Modality; 11] = [
        Modality::Image,
        Modality::Text,
        Modality::Audio,
        Modality::Raw,
        Modality::Timeseries,
        Modality::Classification,
        Modality::Categorical,
        Modality::Segmentation,
        Modality::Regression,
        Modality::Depth,
        Modality::Trend,
    ];

    /// Lower-case name, as used in parameter files
    pub fn name(&self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Text => "text",
            Modality::Audio => "audio",
            Modality::Raw => "raw",
            Modality::Timeseries => "timeseries",
            Modality::Classification => "classification",
            Modality::Categorical => "categorical",
            Modality::Segmentation => "segmentation",
            Modality::Regression => "regression",
            Modality::Depth => "depth",
            Modality::Trend => "trend",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
