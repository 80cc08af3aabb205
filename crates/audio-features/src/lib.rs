//! Audio Feature Extraction
//!
//! Short-time spectral and temporal features over a mono waveform, laid out
//! as `(feature, frame)` matrices with librosa's framing conventions.

mod chroma;
mod features;
mod mel;
mod spectral;
mod stft;
mod temporal;

pub use chroma::chroma_filterbank;
pub use features::{AudioFeature, FeatureExtractor};
pub use mel::{mel_filterbank, power_to_db};
pub use stft::{fft_frequencies, Stft, HOP_LENGTH, N_FFT};

use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    #[error("Cannot extract features from an empty signal")]
    EmptySignal,
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),
}
