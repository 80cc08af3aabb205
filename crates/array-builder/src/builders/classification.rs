//! Classification and Categorical label arrays

use ndarray::{arr0, Array1};
use tracing::debug;

use super::{expect_text, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::ClassificationParameters;
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::Transform;

/// Label index within the configured class list, optionally one-hot.
///
/// Categorical is the same builder under a different tag.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationArray {
    modality: Modality,
}

impl ClassificationArray {
    pub fn classification() -> Self {
        Self {
            modality: Modality::Classification,
        }
    }

    pub fn categorical() -> Self {
        Self {
            modality: Modality::Categorical,
        }
    }
}

impl Default for ClassificationArray {
    fn default() -> Self {
        Self::classification()
    }
}

/// Zero vector of `len` with a single 1 at `index`
pub(crate) fn one_hot(index: usize, len: usize) -> Tensor {
    let mut v = Array1::<u8>::zeros(len);
    v[index] = 1;
    Tensor::U8(v.into_dyn())
}

impl ArrayBuilder for ClassificationArray {
    type Params = ClassificationParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        self.modality
    }

    fn create(&self, source: &Source, params: &ClassificationParameters) -> Result<ArrayData, ArrayError> {
        let label = expect_text(self.modality, source)?;
        let index = params
            .classes_names
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| ArrayError::UnknownLabel {
                modality: self.modality,
                label: label.to_string(),
                classes: params.classes_names.clone(),
            })?;
        debug!("{} label `{}` -> {}", self.modality, label, index);

        let tensor = if params.one_hot_encoding {
            one_hot(index, params.classes_names.len())
        } else {
            Tensor::I64(arr0(index as i64).into_dyn())
        };
        Ok(ArrayData::Tensor(tensor))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        _transform: &dyn Transform,
        _params: &ClassificationParameters,
    ) -> Result<ArrayData, ArrayError> {
        Ok(data)
    }
}
