//! Trend label arrays

use ndarray::arr0;
use tracing::debug;

use super::classification::one_hot;
use super::{expect_values, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::TrendParameters;
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::Transform;

pub const TREND_FLAT: usize = 0;
pub const TREND_UP: usize = 1;
pub const TREND_DOWN: usize = 2;

/// Direction of change between the first two values.
///
/// Flat is tested first, so a rise inside the deviation band stays flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendArray;

impl TrendArray {
    fn label(source: &Source, first: f64, second: f64, deviation: f64) -> Result<usize, ArrayError> {
        if first == 0.0 {
            return Err(ArrayError::ZeroDenominator {
                modality: Modality::Trend,
                source_id: source.describe(),
            });
        }
        let change = ((second - first) / first).abs() * 100.0;
        Ok(if change <= deviation {
            TREND_FLAT
        } else if second > first {
            TREND_UP
        } else {
            TREND_DOWN
        })
    }
}

impl ArrayBuilder for TrendArray {
    type Params = TrendParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Trend
    }

    fn create(&self, source: &Source, params: &TrendParameters) -> Result<ArrayData, ArrayError> {
        let values = expect_values(Modality::Trend, source)?;
        let (first, second) = match values {
            [first, second, ..] => (*first, *second),
            _ => {
                return Err(ArrayError::malformed(
                    Modality::Trend,
                    source,
                    format!("need at least two values, got {}", values.len()),
                ))
            }
        };
        let label = Self::label(source, first, second, params.deviation)?;
        debug!("Trend {} -> {}: label {}", first, second, label);

        let tensor = if params.one_hot_encoding {
            one_hot(label, 3)
        } else {
            Tensor::I64(arr0(label as i64).into_dyn())
        };
        Ok(ArrayData::Tensor(tensor))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        _transform: &dyn Transform,
        _params: &TrendParameters,
    ) -> Result<ArrayData, ArrayError> {
        Ok(data)
    }
}
