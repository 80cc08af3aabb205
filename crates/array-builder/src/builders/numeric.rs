//! Timeseries, Regression and Depth arrays
//!
//! All three preprocess the same way: flatten to one column, transform,
//! restore the original shape.

use ndarray::{arr0, Array1};
use tracing::debug;

use super::{expect_tensor, expect_text, expect_values, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::{DepthParameters, RegressionParameters, TimeseriesParameters};
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::{column_transform, Transform};

fn preprocess_column(
    modality: Modality,
    data: ArrayData,
    transform: &dyn Transform,
) -> Result<ArrayData, ArrayError> {
    let array = expect_tensor(modality, data)?.to_f64();
    let out = column_transform(modality, &array, transform)?;
    Ok(ArrayData::Tensor(Tensor::F64(out)))
}

/// Numeric sequence right-padded with zeros to the configured length
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeseriesArray;

impl ArrayBuilder for TimeseriesArray {
    type Params = TimeseriesParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Timeseries
    }

    fn create(&self, source: &Source, params: &TimeseriesParameters) -> Result<ArrayData, ArrayError> {
        let mut values = expect_values(Modality::Timeseries, source)?.to_vec();
        if values.len() < params.length {
            values.resize(params.length, 0.0);
        }
        debug!("Created timeseries array [{}] from {}", values.len(), source.describe());
        Ok(ArrayData::Tensor(Tensor::F64(Array1::from(values).into_dyn())))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn Transform,
        _params: &TimeseriesParameters,
    ) -> Result<ArrayData, ArrayError> {
        preprocess_column(Modality::Timeseries, data, transform)
    }
}

/// Single floating-point target parsed from a string
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionArray;

impl ArrayBuilder for RegressionArray {
    type Params = RegressionParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Regression
    }

    fn create(&self, source: &Source, _params: &RegressionParameters) -> Result<ArrayData, ArrayError> {
        let text = expect_text(Modality::Regression, source)?;
        let value: f64 = text.trim().parse().map_err(|e| {
            ArrayError::malformed(Modality::Regression, source, format!("not a number: {}", e))
        })?;
        Ok(ArrayData::Tensor(Tensor::F64(arr0(value).into_dyn())))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn Transform,
        _params: &RegressionParameters,
    ) -> Result<ArrayData, ArrayError> {
        preprocess_column(Modality::Regression, data, transform)
    }
}

/// Depth values wrapped as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthArray;

impl ArrayBuilder for DepthArray {
    type Params = DepthParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Depth
    }

    fn create(&self, source: &Source, _params: &DepthParameters) -> Result<ArrayData, ArrayError> {
        let values = expect_values(Modality::Depth, source)?;
        Ok(ArrayData::Tensor(Tensor::F64(Array1::from(values.to_vec()).into_dyn())))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn Transform,
        _params: &DepthParameters,
    ) -> Result<ArrayData, ArrayError> {
        preprocess_column(Modality::Depth, data, transform)
    }
}
