//! Modality Dispatch
//!
//! Routes `create`/`preprocess` to the builder named by a [`Parameters`]
//! tag, supplying the decode collaborators the builders need.

use std::sync::Arc;

use frame_resize::{FsImageDecoder, ImageDecoder};
use tracing::debug;

use crate::builders::{
    ArrayBuilder, AudioArray, AudioDecoder, ClassificationArray, DepthArray, ImageArray, RawArray,
    RegressionArray, SegmentationArray, TextArray, TimeseriesArray, TrendArray,
};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::Parameters;
use crate::source::Source;
use crate::tensor::ArrayData;
use crate::transform::{TextTransform, Transform, IDENTITY};

/// Fitted transform handed to a single `preprocess` call.
///
/// The borrow may be short-lived; the transform type itself must own its
/// fitted state.
#[derive(Clone, Copy)]
pub enum Preprocessor<'a> {
    Numeric(&'a (dyn Transform + 'static)),
    Text(&'a (dyn TextTransform + 'static)),
    /// Nothing fitted; numeric builders pass values through unchanged
    None,
}

impl<'a> Preprocessor<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Preprocessor::Numeric(_) => "numeric",
            Preprocessor::Text(_) => "text",
            Preprocessor::None => "none",
        }
    }

    fn numeric(self, modality: Modality) -> Result<&'a (dyn Transform + 'static), ArrayError> {
        match self {
            Preprocessor::Numeric(t) => Ok(t),
            Preprocessor::None => Ok(&IDENTITY),
            Preprocessor::Text(_) => Err(ArrayError::UnexpectedTransform {
                modality,
                expected: "numeric",
                actual: self.kind(),
            }),
        }
    }

    fn text(
        self,
        modality: Modality,
    ) -> Result<&'a (dyn TextTransform + 'static), ArrayError> {
        match self {
            Preprocessor::Text(t) => Ok(t),
            _ => Err(ArrayError::UnexpectedTransform {
                modality,
                expected: "text",
                actual: self.kind(),
            }),
        }
    }
}

/// Builder registry holding the decode collaborators.
///
/// Shares no mutable state, so one instance can serve many worker threads.
#[derive(Clone)]
pub struct ArrayBuilders {
    image_decoder: Arc<dyn ImageDecoder>,
    audio_decoder: Option<Arc<dyn AudioDecoder>>,
}

impl Default for ArrayBuilders {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayBuilders {
    /// Filesystem image decoding, no audio decoder
    pub fn new() -> Self {
        Self {
            image_decoder: Arc::new(FsImageDecoder),
            audio_decoder: None,
        }
    }

    pub fn with_image_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.image_decoder = decoder;
        self
    }

    pub fn with_audio_decoder(mut self, decoder: Arc<dyn AudioDecoder>) -> Self {
        self.audio_decoder = Some(decoder);
        self
    }

    fn audio(&self) -> Result<AudioArray, ArrayError> {
        self.audio_decoder
            .clone()
            .map(AudioArray::new)
            .ok_or(ArrayError::MissingCollaborator {
                modality: Modality::Audio,
                collaborator: "audio decoder",
            })
    }

    /// Build one sample with the builder matching `params`
    pub fn create(&self, source: &Source, params: &Parameters) -> Result<ArrayData, ArrayError> {
        debug!("Dispatching create for {}", params.modality());
        match params {
            Parameters::Image(p) => ImageArray::new(self.image_decoder.clone()).create(source, p),
            Parameters::Text(p) => TextArray.create(source, p),
            Parameters::Audio(p) => self.audio()?.create(source, p),
            Parameters::Raw(p) => RawArray.create(source, p),
            Parameters::Timeseries(p) => TimeseriesArray.create(source, p),
            Parameters::Classification(p) => ClassificationArray::classification().create(source, p),
            Parameters::Categorical(p) => ClassificationArray::categorical().create(source, p),
            Parameters::Segmentation(p) => {
                SegmentationArray::new(self.image_decoder.clone()).create(source, p)
            }
            Parameters::Regression(p) => RegressionArray.create(source, p),
            Parameters::Depth(p) => DepthArray.create(source, p),
            Parameters::Trend(p) => TrendArray.create(source, p),
        }
    }

    /// Apply a fitted transform with the builder matching `params`.
    ///
    /// Identity builders ignore `transform`.
    pub fn preprocess(
        &self,
        data: ArrayData,
        transform: Preprocessor<'_>,
        params: &Parameters,
    ) -> Result<ArrayData, ArrayError> {
        let modality = params.modality();
        match params {
            Parameters::Image(p) => ImageArray::new(self.image_decoder.clone()).preprocess(
                data,
                transform.numeric(modality)?,
                p,
            ),
            Parameters::Text(p) => TextArray.preprocess(data, transform.text(modality)?, p),
            Parameters::Audio(p) => self.audio()?.preprocess(data, transform.numeric(modality)?, p),
            Parameters::Raw(p) => RawArray.preprocess(data, &IDENTITY, p),
            Parameters::Timeseries(p) => {
                TimeseriesArray.preprocess(data, transform.numeric(modality)?, p)
            }
            Parameters::Classification(p) => {
                ClassificationArray::classification().preprocess(data, &IDENTITY, p)
            }
            Parameters::Categorical(p) => {
                ClassificationArray::categorical().preprocess(data, &IDENTITY, p)
            }
            Parameters::Segmentation(p) => {
                SegmentationArray::new(self.image_decoder.clone()).preprocess(data, &IDENTITY, p)
            }
            Parameters::Regression(p) => {
                RegressionArray.preprocess(data, transform.numeric(modality)?, p)
            }
            Parameters::Depth(p) => DepthArray.preprocess(data, transform.numeric(modality)?, p),
            Parameters::Trend(p) => TrendArray.preprocess(data, &IDENTITY, p),
        }
    }
}
