//! Mel filterbank, decibel scaling and cepstral coefficients

use ndarray::{Array2, Axis};

use crate::stft::fft_frequencies;

/// Number of mel bands feeding the cepstrum
pub(crate) const N_MELS: usize = 128;
/// Number of cepstral coefficients kept
pub(crate) const N_MFCC: usize = 20;
/// Dynamic range kept below the loudest bin (dB)
pub(crate) const TOP_DB: f64 = 80.0;
/// Floor applied before taking logarithms
pub(crate) const AMIN: f64 = 1e-10;

// Slaney mel scale: linear below 1 kHz, logarithmic above.
const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

pub(crate) fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

pub(crate) fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// `n` frequencies evenly spaced on the mel scale between `fmin` and `fmax`
fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    let (lo, hi) = (hz_to_mel(fmin), hz_to_mel(fmax));
    (0..n)
        .map(|i| mel_to_hz(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect()
}

/// Triangular mel filterbank with Slaney area normalization,
/// shape `(n_mels, 1 + n_fft / 2)`, covering `0..sample_rate / 2`.
pub fn mel_filterbank(sample_rate: f64, n_fft: usize, n_mels: usize) -> Array2<f64> {
    let fft_freqs = fft_frequencies(sample_rate, n_fft);
    let mel_f = mel_frequencies(n_mels + 2, 0.0, sample_rate / 2.0);
    let fdiff: Vec<f64> = mel_f.windows(2).map(|w| w[1] - w[0]).collect();

    let mut weights = Array2::zeros((n_mels, fft_freqs.len()));
    for i in 0..n_mels {
        let enorm = 2.0 / (mel_f[i + 2] - mel_f[i]);
        for (k, &f) in fft_freqs.iter().enumerate() {
            let lower = (f - mel_f[i]) / fdiff[i];
            let upper = (mel_f[i + 2] - f) / fdiff[i + 1];
            weights[[i, k]] = lower.min(upper).max(0.0) * enorm;
        }
    }
    weights
}

/// Convert a power spectrogram to decibels relative to 1.0, clipped to
/// [`TOP_DB`] below its peak.
pub fn power_to_db(power: &Array2<f64>) -> Array2<f64> {
    let log_spec = power.mapv(|v| 10.0 * v.max(AMIN).log10());
    let peak = log_spec.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let floor = peak - TOP_DB;
    log_spec.mapv(|v| v.max(floor))
}

/// Orthonormal DCT-II along the first axis, keeping the first `n_out` rows
fn dct_ortho(input: &Array2<f64>, n_out: usize) -> Array2<f64> {
    let n = input.len_of(Axis(0));
    let n_out = n_out.min(n);
    let basis = Array2::from_shape_fn((n_out, n), |(k, i)| {
        let scale = if k == 0 {
            (1.0 / n as f64).sqrt()
        } else {
            (2.0 / n as f64).sqrt()
        };
        scale * (std::f64::consts::PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64).cos()
    });
    basis.dot(input)
}

/// Mel-frequency cepstral coefficients from a power spectrogram,
/// shape `(N_MFCC, frames)`
pub(crate) fn mfcc(power: &Array2<f64>, sample_rate: f64, n_fft: usize) -> Array2<f64> {
    let mel = mel_filterbank(sample_rate, n_fft, N_MELS).dot(power);
    dct_ortho(&power_to_db(&mel), N_MFCC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mel_scale_round_trip_points() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-12);
        assert!((mel_to_hz(15.0) - 1000.0).abs() < 1e-9);
        assert!((mel_to_hz(hz_to_mel(4000.0)) - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn test_filterbank_shape_and_nonnegative() {
        let fb = mel_filterbank(22050.0, 2048, 128);
        assert_eq!(fb.dim(), (128, 1025));
        assert!(fb.iter().all(|&w| w >= 0.0));
        // every band picks up some energy
        assert!(fb.axis_iter(Axis(0)).all(|band| band.sum() > 0.0));
    }

    #[test]
    fn test_power_to_db_clips_dynamic_range() {
        let p = array![[1.0, 1e-12], [100.0, 0.0]];
        let db = power_to_db(&p);
        assert!((db[[1, 0]] - 20.0).abs() < 1e-9);
        assert!((db[[0, 0]] - 0.0).abs() < 1e-9);
        assert!((db[[0, 1]] - (20.0 - TOP_DB)).abs() < 1e-9);
    }

    #[test]
    fn test_dct_of_constant_is_dc_only() {
        let input = Array2::from_elem((8, 1), 1.0);
        let out = dct_ortho(&input, 4);
        assert_eq!(out.dim(), (4, 1));
        assert!((out[[0, 0]] - 8f64.sqrt()).abs() < 1e-12);
        assert!(out.iter().skip(1).all(|v| v.abs() < 1e-12));
    }
}
