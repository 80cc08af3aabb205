//! Raw pass-through arrays

use ndarray::{arr0, Array1};
use tracing::debug;

use super::ArrayBuilder;
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::RawParameters;
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::Transform;

/// Wraps the source as-is; `preprocess` is the identity
#[derive(Debug, Clone, Copy, Default)]
pub struct RawArray;

impl ArrayBuilder for RawArray {
    type Params = RawParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Raw
    }

    fn create(&self, source: &Source, _params: &RawParameters) -> Result<ArrayData, ArrayError> {
        let array = match source {
            Source::Values(values) => Array1::from(values.clone()).into_dyn(),
            Source::Text(text) => {
                let value: f64 = text.trim().parse().map_err(|e| {
                    ArrayError::malformed(Modality::Raw, source, format!("not a number: {}", e))
                })?;
                arr0(value).into_dyn()
            }
            Source::Path(_) => {
                return Err(ArrayError::malformed(
                    Modality::Raw,
                    source,
                    "expected numeric values or a numeric literal",
                ))
            }
        };
        debug!("Created raw array {:?} from {}", array.shape(), source.describe());
        Ok(ArrayData::Tensor(Tensor::F64(array)))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        _transform: &dyn Transform,
        _params: &RawParameters,
    ) -> Result<ArrayData, ArrayError> {
        Ok(data)
    }
}
