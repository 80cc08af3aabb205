//! Array Builder Error Types

use audio_features::FeatureError;
use thiserror::Error;

use crate::modality::Modality;
use crate::source::Source;
use crate::transform::TransformError;

/// Errors raised while creating or preprocessing an array.
///
/// Every variant names the modality, and per-sample variants name the
/// source, so a caller can report and skip a single bad sample.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// Source cannot be split or parsed into the expected fields
    #[error("{modality} source `{source_id}` is malformed: {reason}")]
    MalformedSource {
        modality: Modality,
        source_id: String,
        reason: String,
    },

    /// Source file could not be read or decoded
    #[error("{modality} source `{source_id}` could not be decoded: {reason}")]
    Decode {
        modality: Modality,
        source_id: String,
        reason: String,
    },

    /// Label absent from the configured class list
    #[error("{modality} label `{label}` is not one of {classes:?}")]
    UnknownLabel {
        modality: Modality,
        label: String,
        classes: Vec<String>,
    },

    /// Percentage change against a zero first value
    #[error("{modality} source `{source_id}`: percentage change is undefined for a zero first value")]
    ZeroDenominator { modality: Modality, source_id: String },

    /// Values cannot be arranged into the expected shape
    #[error("{modality} shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        modality: Modality,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{modality} source `{source_id}`: feature extraction failed: {source}")]
    Feature {
        modality: Modality,
        source_id: String,
        #[source]
        source: FeatureError,
    },

    #[error("{modality} transform failed: {source}")]
    Transform {
        modality: Modality,
        #[source]
        source: TransformError,
    },

    /// Builder handed the wrong kind of data
    #[error("{modality} builder expected {expected} data, got {actual}")]
    UnexpectedData {
        modality: Modality,
        expected: &'static str,
        actual: &'static str,
    },

    /// Dispatcher handed the wrong kind of transform
    #[error("{modality} builder expected a {expected} transform, got {actual}")]
    UnexpectedTransform {
        modality: Modality,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("No {collaborator} registered for {modality} arrays")]
    MissingCollaborator {
        modality: Modality,
        collaborator: &'static str,
    },

    #[error("Failed to load parameters: {0}")]
    Config(#[from] config::ConfigError),
}

impl ArrayError {
    pub(crate) fn malformed(modality: Modality, source: &Source, reason: impl Into<String>) -> Self {
        ArrayError::MalformedSource {
            modality,
            source_id: source.describe(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(modality: Modality, source: &Source, reason: impl ToString) -> Self {
        ArrayError::Decode {
            modality,
            source_id: source.describe(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn transform(modality: Modality) -> impl FnOnce(TransformError) -> Self {
        move |source| ArrayError::Transform { modality, source }
    }

    /// Modality the failure belongs to, if any
    pub fn modality(&self) -> Option<Modality> {
        match self {
            ArrayError::MalformedSource { modality, .. }
            | ArrayError::Decode { modality, .. }
            | ArrayError::UnknownLabel { modality, .. }
            | ArrayError::ZeroDenominator { modality, .. }
            | ArrayError::ShapeMismatch { modality, .. }
            | ArrayError::Feature { modality, .. }
            | ArrayError::Transform { modality, .. }
            | ArrayError::UnexpectedData { modality, .. }
            | ArrayError::UnexpectedTransform { modality, .. }
            | ArrayError::MissingCollaborator { modality, .. } => Some(*modality),
            ArrayError::Config(_) => None,
        }
    }
}
