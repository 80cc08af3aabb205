//! Dataset Array Builders
//!
//! Turns raw per-sample inputs into fixed-shape tensors and applies a
//! separately fitted transform to them. One builder per modality:
//! - Image, Segmentation: decoded and resized frames
//! - Text: deferred encoding through a fitted tokenizer or word vectors
//! - Audio: windowed waveform with silence padding and one acoustic feature
//! - Raw, Timeseries, Regression, Depth: numeric pass-through and padding
//! - Classification (Categorical), Trend: label indices and one-hot vectors

pub mod builders;
pub mod dispatch;
pub mod error;
pub mod modality;
pub mod parameters;
pub mod source;
pub mod tensor;
pub mod transform;

pub use builders::{
    ArrayBuilder, AudioArray, AudioDecoder, ClassificationArray, DepthArray, ImageArray, RawArray,
    RegressionArray, SegmentationArray, TextArray, TimeseriesArray, TrendArray, Waveform,
};
pub use dispatch::{ArrayBuilders, Preprocessor};
pub use error::ArrayError;
pub use modality::Modality;
pub use parameters::{
    AudioParameter, AudioParameters, ClassificationParameters, DepthParameters, ImageNetwork,
    ImageParameters, ImageScaling, Parameters, RawParameters, RegressionParameters,
    ResampleAlgorithm, SegmentationClass, SegmentationParameters, TextMode, TextParameters,
    TextProcessing, TimeseriesParameters, TrendParameters,
};
pub use source::Source;
pub use tensor::{ArrayData, DType, Tensor};
pub use transform::{
    IdentityTransform, ImageScaler, MinMaxScaler, ScalerParams, StandardScaler, TextTransform,
    Tokenizer, Transform, TransformError, WordVectors,
};

pub use frame_resize::{FrameMode, FsImageDecoder, ImageDecoder};
