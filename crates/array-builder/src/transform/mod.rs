//! Fitted Transforms
//!
//! Transforms are fitted elsewhere and handed to `preprocess` read-only.
//! Numeric builders call [`Transform::transform`]; the Text builder calls
//! the operation of [`TextTransform`] matching its encoding mode.

mod scaling;
mod text;

pub use scaling::{ImageScaler, MinMaxScaler, ScalerParams, StandardScaler};
pub use text::{TextTransform, Tokenizer, WordVectors};

use ndarray::{ArrayD, ArrayViewD};
use thiserror::Error;

use crate::error::ArrayError;
use crate::modality::Modality;

/// Errors raised by a fitted transform
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    #[error("Feature mismatch: fitted on {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Invalid input shape: {0}")]
    InvalidShape(String),

    #[error("Operation not supported by this transform: {0}")]
    Unsupported(&'static str),

    #[error("Invalid fitted parameters: {0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fitted numeric mapping applied by `preprocess`
pub trait Transform: Send + Sync {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError>;
}

/// Pass-through transform
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError> {
        Ok(input.to_owned())
    }
}

pub(crate) static IDENTITY: IdentityTransform = IdentityTransform;

/// Flatten to a single column, transform it and restore the original shape.
pub(crate) fn column_transform(
    modality: Modality,
    array: &ArrayD<f64>,
    transform: &dyn Transform,
) -> Result<ArrayD<f64>, ArrayError> {
    let shape = array.shape().to_vec();
    let n = array.len();
    let column = array
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((n, 1))
        .map_err(|_| shape_mismatch(modality, vec![n, 1], shape.clone()))?
        .into_dyn();

    let out = transform
        .transform(column.view())
        .map_err(ArrayError::transform(modality))?;
    restore_shape(modality, out, &shape)
}

/// Apply a transform directly and require it to keep the input shape.
pub(crate) fn direct_transform(
    modality: Modality,
    array: &ArrayD<f64>,
    transform: &dyn Transform,
) -> Result<ArrayD<f64>, ArrayError> {
    let out = transform
        .transform(array.view())
        .map_err(ArrayError::transform(modality))?;
    if out.shape() != array.shape() {
        return Err(shape_mismatch(modality, array.shape().to_vec(), out.shape().to_vec()));
    }
    Ok(out)
}

fn restore_shape(modality: Modality, out: ArrayD<f64>, shape: &[usize]) -> Result<ArrayD<f64>, ArrayError> {
    let expected_len: usize = shape.iter().product();
    if out.len() != expected_len {
        return Err(shape_mismatch(modality, shape.to_vec(), out.shape().to_vec()));
    }
    let actual = out.shape().to_vec();
    out.as_standard_layout()
        .into_owned()
        .into_shape_with_order(shape)
        .map_err(|_| shape_mismatch(modality, shape.to_vec(), actual))
}

fn shape_mismatch(modality: Modality, expected: Vec<usize>, actual: Vec<usize>) -> ArrayError {
    ArrayError::ShapeMismatch {
        modality,
        expected,
        actual,
    }
}
