//! Chromagram from a power spectrogram

use ndarray::{Array2, Axis};

/// Pitch classes per octave
pub(crate) const N_CHROMA: usize = 12;
/// Centre of the octave weighting (octaves above A0)
const CENTER_OCTAVE: f64 = 5.0;
/// Gaussian width of the octave weighting (octaves)
const OCTAVE_WIDTH: f64 = 2.0;
/// Reference pitch, tuning assumed to be zero cents
const A440: f64 = 440.0;

/// Chroma filterbank, shape `(12, 1 + n_fft / 2)`, rows starting at C.
///
/// Each FFT bin contributes a Gaussian bump centred on its fractional pitch
/// class, columns are L2-normalized and then weighted by a Gaussian over
/// octaves centred on [`CENTER_OCTAVE`].
///
/// Pitch classes are laid out for A4 = 440 Hz exactly. No tuning offset is
/// estimated from the signal, so material tuned away from concert pitch
/// spreads energy into neighbouring classes where an estimated-tuning
/// chromagram would not.
pub fn chroma_filterbank(sample_rate: f64, n_fft: usize) -> Array2<f64> {
    let n_chroma = N_CHROMA as f64;

    // fractional pitch-class position of every non-DC bin, DC extrapolated
    let mut frqbins: Vec<f64> = (1..n_fft)
        .map(|k| {
            let f = k as f64 * sample_rate / n_fft as f64;
            n_chroma * (f / (A440 / 16.0)).log2()
        })
        .collect();
    let dc = frqbins.first().copied().unwrap_or(0.0) - 1.5 * n_chroma;
    frqbins.insert(0, dc);

    let mut binwidth: Vec<f64> = frqbins.windows(2).map(|w| (w[1] - w[0]).max(1.0)).collect();
    binwidth.push(1.0);

    let half = (n_chroma / 2.0).round();
    let mut wts = Array2::from_shape_fn((N_CHROMA, n_fft), |(c, k)| {
        let d = (frqbins[k] - c as f64 + half + 10.0 * n_chroma).rem_euclid(n_chroma) - half;
        (-0.5 * (2.0 * d / binwidth[k]).powi(2)).exp()
    });

    for (k, mut column) in wts.axis_iter_mut(Axis(1)).enumerate() {
        let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
        let octave_weight =
            (-0.5 * ((frqbins[k] / n_chroma - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp();
        let scale = if norm < f64::MIN_POSITIVE { 1.0 } else { 1.0 / norm };
        column.mapv_inplace(|v| v * scale * octave_weight);
    }

    // rotate rows so that index 0 is C rather than A
    let n_bins = 1 + n_fft / 2;
    Array2::from_shape_fn((N_CHROMA, n_bins), |(c, k)| wts[[(c + 3) % N_CHROMA, k]])
}

/// Chromagram, shape `(12, frames)`, each frame scaled to a peak of 1
pub(crate) fn chroma_stft(power: &Array2<f64>, sample_rate: f64, n_fft: usize) -> Array2<f64> {
    let mut chroma = chroma_filterbank(sample_rate, n_fft).dot(power);
    for mut column in chroma.axis_iter_mut(Axis(1)) {
        let peak = column.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        if peak >= f64::MIN_POSITIVE {
            column.mapv_inplace(|v| v / peak);
        }
    }
    chroma
}
