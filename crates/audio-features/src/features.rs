//! Feature selection and extraction

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chroma::chroma_stft;
use crate::mel::mfcc;
use crate::spectral::{bandwidth, centroid, rolloff};
use crate::stft::{fft_frequencies, Stft, HOP_LENGTH, N_FFT};
use crate::temporal::{rms, zero_crossing_rate};
use crate::FeatureError;

/// Acoustic feature computed from a waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFeature {
    /// 12-bin chromagram
    ChromaStft,
    /// 20 mel-frequency cepstral coefficients
    Mfcc,
    SpectralCentroid,
    SpectralBandwidth,
    SpectralRolloff,
    /// Root-mean-square energy
    Rms,
    ZeroCrossingRate,
}

impl AudioFeature {
    /// Number of rows the feature produces per frame
    pub fn rows(&self) -> usize {
        match self {
            AudioFeature::ChromaStft => crate::chroma::N_CHROMA,
            AudioFeature::Mfcc => crate::mel::N_MFCC,
            _ => 1,
        }
    }
}

/// Feature extractor for a fixed sample rate
pub struct FeatureExtractor {
    /// STFT with cached FFT plans
    stft: Stft,
    /// Sample rate (Hz)
    sample_rate: f64,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(sample_rate: f64) -> Result<Self, FeatureError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FeatureError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            stft: Stft::default(),
            sample_rate,
        })
    }

    /// Compute one feature, shape `(feature.rows(), frames)`
    pub fn extract(&mut self, feature: AudioFeature, y: &[f64]) -> Result<Array2<f64>, FeatureError> {
        let out = match feature {
            AudioFeature::ChromaStft => chroma_stft(&self.stft.power(y)?, self.sample_rate, N_FFT),
            AudioFeature::Mfcc => mfcc(&self.stft.power(y)?, self.sample_rate, N_FFT),
            AudioFeature::SpectralCentroid => centroid(&self.stft.magnitude(y)?, &self.freqs()),
            AudioFeature::SpectralBandwidth => bandwidth(&self.stft.magnitude(y)?, &self.freqs()),
            AudioFeature::SpectralRolloff => rolloff(&self.stft.magnitude(y)?, &self.freqs()),
            AudioFeature::Rms => rms(y, N_FFT, HOP_LENGTH)?,
            AudioFeature::ZeroCrossingRate => zero_crossing_rate(y, N_FFT, HOP_LENGTH)?,
        };
        debug!("Extracted {:?}: {} samples -> {:?}", feature, y.len(), out.dim());
        Ok(out)
    }

    fn freqs(&self) -> Vec<f64> {
        fft_frequencies(self.sample_rate, self.stft.n_fft())
    }
}
