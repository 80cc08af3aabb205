//! Array Builders
//!
//! One builder per modality, each implementing [`ArrayBuilder`].

mod audio;
mod classification;
mod image;
mod numeric;
mod raw;
mod segmentation;
mod text;
mod trend;

pub use self::audio::{AudioArray, AudioDecoder, Waveform};
pub use self::classification::ClassificationArray;
pub use self::image::ImageArray;
pub use self::numeric::{DepthArray, RegressionArray, TimeseriesArray};
pub use self::raw::RawArray;
pub use self::segmentation::SegmentationArray;
pub use self::text::TextArray;
pub use self::trend::TrendArray;

use crate::error::ArrayError;
use crate::modality::Modality;
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};

/// Capability shared by every modality builder.
///
/// `create` turns one raw sample into a tensor whose shape depends only on
/// `params`. `preprocess` applies a fitted transform to created data and
/// keeps its shape. Neither mutates `params` or the transform.
pub trait ArrayBuilder {
    /// Parameter record configuring both operations
    type Params;
    /// Fitted transform accepted by `preprocess`
    type Fitted: ?Sized;

    fn modality(&self) -> Modality;

    fn create(&self, source: &Source, params: &Self::Params) -> Result<ArrayData, ArrayError>;

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &Self::Fitted,
        params: &Self::Params,
    ) -> Result<ArrayData, ArrayError>;
}

pub(crate) fn expect_tensor(modality: Modality, data: ArrayData) -> Result<Tensor, ArrayError> {
    match data {
        ArrayData::Tensor(t) => Ok(t),
        ArrayData::Text(_) => Err(ArrayError::UnexpectedData {
            modality,
            expected: "tensor",
            actual: "text",
        }),
    }
}

pub(crate) fn expect_values(modality: Modality, source: &Source) -> Result<&[f64], ArrayError> {
    source
        .as_values()
        .ok_or_else(|| ArrayError::malformed(modality, source, "expected a numeric sequence"))
}

pub(crate) fn expect_text(modality: Modality, source: &Source) -> Result<&str, ArrayError> {
    source
        .as_text()
        .ok_or_else(|| ArrayError::malformed(modality, source, "expected a string"))
}
