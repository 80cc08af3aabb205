//! Short-Time Fourier Transform

use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

use crate::FeatureError;

/// FFT window length in samples
pub const N_FFT: usize = 2048;
/// Hop between successive frames in samples
pub const HOP_LENGTH: usize = 512;

/// STFT with centred, zero-padded frames and a periodic Hann window
pub struct Stft {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
    /// Window length
    n_fft: usize,
    /// Frame hop
    hop_length: usize,
    /// Precomputed analysis window
    window: Vec<f64>,
}

impl Stft {
    /// Create a new STFT
    pub fn new(n_fft: usize, hop_length: usize) -> Self {
        Self {
            planner: FftPlanner::new(),
            n_fft,
            hop_length,
            window: Self::hann_window(n_fft),
        }
    }

    /// Periodic Hann window (the DFT-even variant used for spectral analysis)
    fn hann_window(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos())
            .collect()
    }

    /// Number of frequency bins per frame
    pub fn n_bins(&self) -> usize {
        1 + self.n_fft / 2
    }

    /// Window length
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Magnitude spectrogram, shape `(1 + n_fft / 2, frames)`
    pub fn magnitude(&mut self, y: &[f64]) -> Result<Array2<f64>, FeatureError> {
        if y.is_empty() {
            return Err(FeatureError::EmptySignal);
        }

        let padded = pad_constant(y, self.n_fft / 2);
        let n_frames = frame_count(padded.len(), self.n_fft, self.hop_length);
        let n_bins = self.n_bins();
        let fft = self.planner.plan_fft_forward(self.n_fft);

        let mut spectrogram = Array2::zeros((n_bins, n_frames));
        let mut buffer = vec![Complex::new(0.0, 0.0); self.n_fft];

        for t in 0..n_frames {
            let frame = &padded[t * self.hop_length..t * self.hop_length + self.n_fft];
            for ((slot, &sample), &w) in buffer.iter_mut().zip(frame).zip(&self.window) {
                *slot = Complex::new(sample * w, 0.0);
            }
            fft.process(&mut buffer);
            for (k, c) in buffer.iter().take(n_bins).enumerate() {
                spectrogram[[k, t]] = c.norm();
            }
        }

        trace!("STFT: {} samples -> {} bins x {} frames", y.len(), n_bins, n_frames);
        Ok(spectrogram)
    }

    /// Power spectrogram (magnitude squared)
    pub fn power(&mut self, y: &[f64]) -> Result<Array2<f64>, FeatureError> {
        Ok(self.magnitude(y)?.mapv(|v| v * v))
    }
}

impl Default for Stft {
    fn default() -> Self {
        Self::new(N_FFT, HOP_LENGTH)
    }
}

/// Centre frequency of each STFT bin
pub fn fft_frequencies(sample_rate: f64, n_fft: usize) -> Vec<f64> {
    (0..=n_fft / 2)
        .map(|k| k as f64 * sample_rate / n_fft as f64)
        .collect()
}

pub(crate) fn frame_count(len: usize, frame_length: usize, hop_length: usize) -> usize {
    if len < frame_length {
        0
    } else {
        1 + (len - frame_length) / hop_length
    }
}

pub(crate) fn pad_constant(y: &[f64], pad: usize) -> Vec<f64> {
    let mut padded = vec![0.0; y.len() + 2 * pad];
    padded[pad..pad + y.len()].copy_from_slice(y);
    padded
}

pub(crate) fn pad_edge(y: &[f64], pad: usize) -> Vec<f64> {
    let first = y.first().copied().unwrap_or(0.0);
    let last = y.last().copied().unwrap_or(0.0);
    let mut padded = Vec::with_capacity(y.len() + 2 * pad);
    padded.extend(std::iter::repeat(first).take(pad));
    padded.extend_from_slice(y);
    padded.extend(std::iter::repeat(last).take(pad));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_matches_centred_framing() {
        let mut stft = Stft::default();
        let spec = stft.magnitude(&vec![0.1; 16000]).unwrap();
        assert_eq!(spec.dim(), (1025, 1 + 16000 / 512));
    }

    #[test]
    fn test_sine_peak_bin() {
        // 1 kHz at 16 kHz lands exactly on bin 128 for n_fft = 2048
        let sr = 16000.0;
        let y: Vec<f64> = (0..8192)
            .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / sr).sin())
            .collect();
        let mut stft = Stft::default();
        let spec = stft.magnitude(&y).unwrap();
        let column = spec.column(8);
        let peak = column
            .iter()
            .enumerate()
            .fold((0, 0.0), |acc, (k, &v)| if v > acc.1 { (k, v) } else { acc });
        assert_eq!(peak.0, 128);
    }

    #[test]
    fn test_empty_signal() {
        let mut stft = Stft::default();
        assert!(matches!(stft.magnitude(&[]), Err(FeatureError::EmptySignal)));
    }

    #[test]
    fn test_padding_helpers() {
        assert_eq!(pad_constant(&[1.0, 2.0], 2), vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(pad_edge(&[1.0, 2.0], 2), vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_fft_frequencies() {
        let freqs = fft_frequencies(22050.0, 2048);
        assert_eq!(freqs.len(), 1025);
        assert!((freqs[1024] - 11025.0).abs() < 1e-9);
    }
}
