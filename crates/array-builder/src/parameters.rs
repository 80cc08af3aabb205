//! Per-modality parameter records
//!
//! Records arrive already validated and are never mutated by a builder.

use std::path::Path;

use audio_features::AudioFeature;
use frame_resize::FrameMode;
use serde::{Deserialize, Serialize};

use crate::error::ArrayError;
use crate::modality::Modality;

/// Network topology the image tensor feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageNetwork {
    /// Keep `(height, width, 3)`
    #[default]
    Convolutional,
    /// Flatten to `height * width * 3` for fully-connected input
    Linear,
}

/// Scaler family configured for image arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageScaling {
    #[default]
    None,
    MinMaxScaler,
    /// Per-sample image scaler, applied to each leading-axis row
    ImageScaler,
}

/// Image configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageParameters {
    /// Target height (pixels)
    pub height: u32,
    /// Target width (pixels)
    pub width: u32,
    /// Resize policy
    #[serde(default)]
    pub process: FrameMode,
    #[serde(default)]
    pub network: ImageNetwork,
    #[serde(default)]
    pub preprocessing: ImageScaling,
}

impl Default for ImageParameters {
    fn default() -> Self {
        Self {
            height: 176,
            width: 240,
            process: FrameMode::Stretch,
            network: ImageNetwork::Convolutional,
            preprocessing: ImageScaling::None,
        }
    }
}

impl ImageParameters {
    /// Flattened input for a fully-connected network
    pub fn linear(height: u32, width: u32) -> Self {
        Self {
            height,
            width,
            network: ImageNetwork::Linear,
            ..Default::default()
        }
    }
}

/// Text encoding family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProcessing {
    /// Token id sequence
    #[default]
    Embedding,
    /// Fixed-width indicator vector
    BagOfWords,
    /// Sequence of word vectors
    WordToVec,
}

/// How text samples were cut from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Whole text, bounded by `max_words`
    #[default]
    Full,
    /// Sliding windows of `length` words
    LengthAndStep,
}

/// Text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParameters {
    #[serde(default)]
    pub preprocessing: TextProcessing,
    #[serde(default)]
    pub mode: TextMode,
    /// Sequence length in `Full` mode
    #[serde(default)]
    pub max_words: usize,
    /// Window length in `LengthAndStep` mode and word-to-vec padding length
    #[serde(default)]
    pub length: usize,
    /// Word vector width
    #[serde(default)]
    pub word2vec_size: usize,
}

impl Default for TextParameters {
    fn default() -> Self {
        Self {
            preprocessing: TextProcessing::Embedding,
            mode: TextMode::Full,
            max_words: 100,
            length: 100,
            word2vec_size: 200,
        }
    }
}

impl TextParameters {
    /// Token ids padded or truncated to `max_words`
    pub fn embedding_full(max_words: usize) -> Self {
        Self {
            max_words,
            ..Default::default()
        }
    }

    /// Word vectors padded to `length` words
    pub fn word_to_vec(length: usize, word2vec_size: usize) -> Self {
        Self {
            preprocessing: TextProcessing::WordToVec,
            mode: TextMode::LengthAndStep,
            length,
            word2vec_size,
            ..Default::default()
        }
    }
}

/// Resampling algorithm requested from the audio decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleAlgorithm {
    #[default]
    KaiserBest,
    KaiserFast,
    Scipy,
}

/// Acoustic feature stored for each audio sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioParameter {
    /// The padded waveform itself
    #[default]
    AudioSignal,
    ChromaStft,
    Mfcc,
    Rms,
    SpectralRolloff,
    SpectralBandwidth,
    SpectralCentroid,
    ZeroCrossingRate,
}

impl AudioParameter {
    /// Extracted feature, `None` for the raw waveform
    pub fn feature(&self) -> Option<AudioFeature> {
        match self {
            AudioParameter::AudioSignal => None,
            AudioParameter::ChromaStft => Some(AudioFeature::ChromaStft),
            AudioParameter::Mfcc => Some(AudioFeature::Mfcc),
            AudioParameter::Rms => Some(AudioFeature::Rms),
            AudioParameter::SpectralRolloff => Some(AudioFeature::SpectralRolloff),
            AudioParameter::SpectralBandwidth => Some(AudioFeature::SpectralBandwidth),
            AudioParameter::SpectralCentroid => Some(AudioFeature::SpectralCentroid),
            AudioParameter::ZeroCrossingRate => Some(AudioFeature::ZeroCrossingRate),
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioParameters {
    /// Target sample rate (Hz)
    pub sample_rate: u32,
    #[serde(default)]
    pub resample: ResampleAlgorithm,
    #[serde(default)]
    pub parameter: AudioParameter,
}

impl Default for AudioParameters {
    fn default() -> Self {
        Self {
            sample_rate: 22050,
            resample: ResampleAlgorithm::KaiserBest,
            parameter: AudioParameter::AudioSignal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParameters {}

/// Timeseries configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesParameters {
    /// Minimum sequence length, shorter inputs get trailing zeros
    pub length: usize,
}

/// Classification and Categorical configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationParameters {
    /// Ordered class names, position is the label index
    pub classes_names: Vec<String>,
    #[serde(default)]
    pub one_hot_encoding: bool,
}

impl ClassificationParameters {
    pub fn new<I, S>(classes: I, one_hot_encoding: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes_names: classes.into_iter().map(Into::into).collect(),
            one_hot_encoding,
        }
    }
}

/// One segmentation class and the mask colour that marks it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationClass {
    pub name: String,
    pub color: [u8; 3],
}

impl SegmentationClass {
    pub fn new(name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Segmentation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationParameters {
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub process: FrameMode,
    /// Per-channel tolerance around each class colour
    pub rgb_range: u8,
    /// Classes in channel order
    pub classes: Vec<SegmentationClass>,
}

impl Default for SegmentationParameters {
    fn default() -> Self {
        Self {
            height: 176,
            width: 240,
            process: FrameMode::Stretch,
            rgb_range: 50,
            classes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionParameters {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthParameters {}

/// Trend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendParameters {
    /// Largest absolute percentage change still labelled flat
    pub deviation: f64,
    #[serde(default)]
    pub one_hot_encoding: bool,
}

/// Parameter record tagged with its modality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modality", rename_all = "snake_case")]
pub enum Parameters {
    Image(ImageParameters),
    Text(TextParameters),
    Audio(AudioParameters),
    Raw(RawParameters),
    Timeseries(TimeseriesParameters),
    Classification(ClassificationParameters),
    Categorical(ClassificationParameters),
    Segmentation(SegmentationParameters),
    Regression(RegressionParameters),
    Depth(DepthParameters),
    Trend(TrendParameters),
}

impl Parameters {
    pub fn modality(&self) -> Modality {
        match self {
            Parameters::Image(_) => Modality::Image,
            Parameters::Text(_) => Modality::Text,
            Parameters::Audio(_) => Modality::Audio,
            Parameters::Raw(_) => Modality::Raw,
            Parameters::Timeseries(_) => Modality::Timeseries,
            Parameters::Classification(_) => Modality::Classification,
            Parameters::Categorical(_) => Modality::Categorical,
            Parameters::Segmentation(_) => Modality::Segmentation,
            Parameters::Regression(_) => Modality::Regression,
            Parameters::Depth(_) => Modality::Depth,
            Parameters::Trend(_) => Modality::Trend,
        }
    }

    /// Load a record from a TOML, JSON or YAML file (format from extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArrayError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
