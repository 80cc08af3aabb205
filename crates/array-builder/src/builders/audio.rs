//! Audio arrays

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use audio_features::FeatureExtractor;
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use super::{expect_tensor, expect_text, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::{AudioParameters, ResampleAlgorithm};
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::{column_transform, direct_transform, Transform};

/// Mono waveform returned by an [`AudioDecoder`]
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    /// Actual sample rate (Hz)
    pub sample_rate: u32,
}

/// Audio decode collaborator.
///
/// Loads `duration` seconds starting at `offset`, resampled to
/// `sample_rate`. May return fewer samples near the end of the file.
pub trait AudioDecoder: Send + Sync {
    fn load(
        &self,
        path: &Path,
        sample_rate: u32,
        offset: f64,
        duration: f64,
        resample: ResampleAlgorithm,
    ) -> Result<Waveform, Box<dyn Error + Send + Sync>>;
}

/// Windowed waveform, silence-padded, optionally reduced to one feature
#[derive(Clone)]
pub struct AudioArray {
    decoder: Arc<dyn AudioDecoder>,
}

/// `path;start:stop` split into path, offset and duration (seconds)
fn parse_window(source: &Source) -> Result<(&Path, f64, f64), ArrayError> {
    let text = expect_text(Modality::Audio, source)?;
    let malformed = |reason: String| ArrayError::malformed(Modality::Audio, source, reason);

    let (path, times) = match text.split(';').collect::<Vec<_>>()[..] {
        [path, times] => (path, times),
        _ => return Err(malformed("expected `<path>;<start>:<stop>`".into())),
    };
    let (start, stop) = match times.split(':').collect::<Vec<_>>()[..] {
        [start, stop] => (start, stop),
        _ => return Err(malformed(format!("expected `<start>:<stop>`, got `{}`", times))),
    };
    let parse = |field: &str| {
        field
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad time `{}`: {}", field, e)))
    };
    let offset = parse(start)?;
    let duration = parse(stop)? - offset;
    if !(offset.is_finite() && duration.is_finite()) || duration < 0.0 {
        return Err(malformed(format!("invalid window {}..{}", start, stop)));
    }
    Ok((Path::new(path), offset, duration))
}

/// Longest window accepted, in samples
const MAX_WINDOW_SAMPLES: f64 = i32::MAX as f64;

/// Number of samples a window of `duration` seconds must have
fn target_len(source: &Source, sample_rate: u32, duration: f64) -> Result<usize, ArrayError> {
    let samples = (f64::from(sample_rate) * duration).round_ties_even();
    if !(0.0..=MAX_WINDOW_SAMPLES).contains(&samples) {
        return Err(ArrayError::malformed(
            Modality::Audio,
            source,
            format!("window of {}s at {} Hz is too long", duration, sample_rate),
        ));
    }
    Ok(samples as usize)
}

impl AudioArray {
    pub fn new(decoder: Arc<dyn AudioDecoder>) -> Self {
        Self { decoder }
    }

    fn feature_tensor(
        source: &Source,
        samples: Vec<f32>,
        params: &AudioParameters,
    ) -> Result<Tensor, ArrayError> {
        let feature = match params.parameter.feature() {
            Some(feature) => feature,
            None => return Ok(Tensor::F32(Array1::from(samples).into_dyn())),
        };
        let feature_error = |e| ArrayError::Feature {
            modality: Modality::Audio,
            source_id: source.describe(),
            source: e,
        };

        let y: Vec<f64> = samples.into_iter().map(f64::from).collect();
        let mut extractor =
            FeatureExtractor::new(f64::from(params.sample_rate)).map_err(feature_error)?;
        let out: Array2<f64> = extractor.extract(feature, &y).map_err(feature_error)?;

        let array = match feature {
            audio_features::AudioFeature::Rms => out.index_axis(Axis(0), 0).to_owned().into_dyn(),
            _ => out.t().as_standard_layout().into_owned().into_dyn(),
        };
        Ok(Tensor::F32(array.mapv(|v| v as f32)))
    }
}

impl ArrayBuilder for AudioArray {
    type Params = AudioParameters;
    type Fitted = dyn Transform;

    fn modality(&self) -> Modality {
        Modality::Audio
    }

    fn create(&self, source: &Source, params: &AudioParameters) -> Result<ArrayData, ArrayError> {
        let (path, offset, duration) = parse_window(source)?;
        let target = target_len(source, params.sample_rate, duration)?;
        let waveform = self
            .decoder
            .load(path, params.sample_rate, offset, duration, params.resample)
            .map_err(|e| ArrayError::decode(Modality::Audio, source, e))?;
        if waveform.sample_rate != params.sample_rate {
            warn!(
                "Decoder returned {} Hz for {}, expected {} Hz",
                waveform.sample_rate,
                source.describe(),
                params.sample_rate
            );
        }

        let mut samples = waveform.samples;
        if samples.len() < target {
            samples.resize(target, 0.0);
        }

        let tensor = Self::feature_tensor(source, samples, params)?;
        debug!(
            "Created audio array {:?} ({:?}) from {}",
            tensor.shape(),
            params.parameter,
            source.describe()
        );
        Ok(ArrayData::Tensor(tensor))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn Transform,
        _params: &AudioParameters,
    ) -> Result<ArrayData, ArrayError> {
        let array = expect_tensor(Modality::Audio, data)?.to_f64();
        let out = if array.ndim() > 1 {
            column_transform(Modality::Audio, &array, transform)?
        } else {
            direct_transform(Modality::Audio, &array, transform)?
        };
        Ok(ArrayData::Tensor(Tensor::F32(out.mapv(|v| v as f32))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::AudioParameter;
    use crate::transform::{IdentityTransform, StandardScaler};
    use audio_features::HOP_LENGTH;

    /// A sine clip of fixed length, sliced to the requested window
    struct ClipDecoder {
        seconds: f64,
        rate: Option<u32>,
    }

    impl AudioDecoder for ClipDecoder {
        fn load(
            &self,
            _path: &Path,
            sample_rate: u32,
            offset: f64,
            duration: f64,
            _resample: ResampleAlgorithm,
        ) -> Result<Waveform, Box<dyn Error + Send + Sync>> {
            let sr = f64::from(sample_rate);
            let start = (offset * sr) as usize;
            let end = (((offset + duration).min(self.seconds)) * sr) as usize;
            let samples = (start..end.max(start))
                .map(|i| (i as f32 * 0.01).sin() * 0.5)
                .collect();
            Ok(Waveform {
                samples,
                sample_rate: self.rate.unwrap_or(sample_rate),
            })
        }
    }

    struct MissingFile;

    impl AudioDecoder for MissingFile {
        fn load(
            &self,
            path: &Path,
            _: u32,
            _: f64,
            _: f64,
            _: ResampleAlgorithm,
        ) -> Result<Waveform, Box<dyn Error + Send + Sync>> {
            Err(format!("{} not found", path.display()).into())
        }
    }

    fn builder(seconds: f64) -> AudioArray {
        AudioArray::new(Arc::new(ClipDecoder { seconds, rate: None }))
    }

    fn params(parameter: AudioParameter) -> AudioParameters {
        AudioParameters {
            sample_rate: 16000,
            parameter,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_window() {
        let source = Source::from("clips/a.wav; 0.5:2.0");
        let (path, offset, duration) = parse_window(&source).unwrap();
        assert_eq!(path, Path::new("clips/a.wav"));
        assert_eq!(offset, 0.5);
        assert_eq!(duration, 1.5);
    }

    #[test]
    fn test_malformed_sources() {
        for bad in ["a.wav", "a.wav;1.0", "a.wav;1:2;3", "a.wav;x:2", "a.wav;1:2:3", "a.wav;3:1"] {
            let err = parse_window(&Source::from(bad)).unwrap_err();
            assert!(
                matches!(err, ArrayError::MalformedSource { modality: Modality::Audio, .. }),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_oversized_window_rejected() {
        for window in ["a.wav;0:1e300", "a.wav;0:200000"] {
            let err = builder(1.0)
                .create(&Source::from(window), &params(AudioParameter::AudioSignal))
                .unwrap_err();
            assert!(
                matches!(err, ArrayError::MalformedSource { modality: Modality::Audio, .. }),
                "{}",
                window
            );
        }
    }

    #[test]
    fn test_silence_padding() {
        let out = builder(1.5)
            .create(&Source::from("a.wav;0:2.0"), &params(AudioParameter::AudioSignal))
            .unwrap();
        let tensor = out.into_tensor().unwrap();
        assert_eq!(tensor.shape(), &[32000]);
        let samples = tensor.as_f32().unwrap();
        assert!(samples.iter().skip(24000).all(|&v| v == 0.0));
        assert!(samples.iter().take(24000).any(|&v| v != 0.0));
    }

    #[test]
    fn test_full_window_not_padded_further() {
        let out = builder(10.0)
            .create(&Source::from("a.wav;1.0:1.25"), &params(AudioParameter::AudioSignal))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &[4000]);
    }

    #[test]
    fn test_mfcc_frames_lead() {
        let out = builder(1.0)
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::Mfcc))
            .unwrap();
        let tensor = out.into_tensor().unwrap();
        assert_eq!(tensor.shape(), &[1 + 16000 / HOP_LENGTH, 20]);
        assert_eq!(tensor.dtype(), crate::tensor::DType::F32);
    }

    #[test]
    fn test_chroma_shape() {
        let out = builder(1.0)
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::ChromaStft))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &[1 + 16000 / HOP_LENGTH, 12]);
    }

    #[test]
    fn test_rms_is_one_dimensional() {
        let out = builder(1.0)
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::Rms))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &[1 + 16000 / HOP_LENGTH]);
    }

    #[test]
    fn test_zero_crossing_rate_keeps_column() {
        let out = builder(1.0)
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::ZeroCrossingRate))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &[1 + 16000 / HOP_LENGTH, 1]);
    }

    #[test]
    fn test_empty_window_feature_fails() {
        let err = builder(1.0)
            .create(&Source::from("a.wav;0.5:0.5"), &params(AudioParameter::SpectralCentroid))
            .unwrap_err();
        assert!(matches!(err, ArrayError::Feature { .. }));
    }

    #[test]
    fn test_rate_mismatch_still_padded_to_configured_rate() {
        let decoder = ClipDecoder {
            seconds: 0.5,
            rate: Some(8000),
        };
        let out = AudioArray::new(Arc::new(decoder))
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::AudioSignal))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &[16000]);
    }

    #[test]
    fn test_decode_failure() {
        let err = AudioArray::new(Arc::new(MissingFile))
            .create(&Source::from("gone.wav;0:1"), &params(AudioParameter::AudioSignal))
            .unwrap_err();
        match err {
            ArrayError::Decode { reason, .. } => assert!(reason.contains("gone.wav")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_preprocess_paths() {
        let scaler = StandardScaler::new(vec![1.0], vec![2.0]).unwrap();
        let flat = ArrayData::Tensor(Tensor::F32(ndarray::arr1(&[3.0f32, 5.0]).into_dyn()));
        let out = builder(1.0)
            .preprocess(flat, &scaler, &params(AudioParameter::AudioSignal))
            .unwrap();
        assert_eq!(
            out.as_tensor().unwrap().as_f32().unwrap(),
            &ndarray::arr1(&[1.0f32, 2.0]).into_dyn()
        );

        let matrix = builder(1.0)
            .create(&Source::from("a.wav;0:1.0"), &params(AudioParameter::Mfcc))
            .unwrap();
        let shape = matrix.as_tensor().unwrap().shape().to_vec();
        let out = builder(1.0)
            .preprocess(matrix, &IdentityTransform, &params(AudioParameter::Mfcc))
            .unwrap();
        assert_eq!(out.as_tensor().unwrap().shape(), &shape[..]);
    }
}
