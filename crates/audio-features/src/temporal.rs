//! Frame-wise temporal features computed directly on the waveform

use ndarray::{Array1, Array2, Axis};

use crate::stft::{frame_count, pad_constant, pad_edge};
use crate::FeatureError;

/// Magnitudes at or below this count as zero when detecting sign changes
const ZERO_THRESHOLD: f64 = 1e-10;

/// Root-mean-square energy per zero-padded frame, shape `(1, frames)`
pub(crate) fn rms(y: &[f64], frame_length: usize, hop_length: usize) -> Result<Array2<f64>, FeatureError> {
    if y.is_empty() {
        return Err(FeatureError::EmptySignal);
    }
    let padded = pad_constant(y, frame_length / 2);
    let values: Vec<f64> = (0..frame_count(padded.len(), frame_length, hop_length))
        .map(|t| {
            let frame = &padded[t * hop_length..t * hop_length + frame_length];
            (frame.iter().map(|v| v * v).sum::<f64>() / frame_length as f64).sqrt()
        })
        .collect();
    Ok(Array1::from(values).insert_axis(Axis(0)))
}

/// Fraction of sign changes per edge-padded frame, shape `(1, frames)`.
///
/// Zero is treated as positive.
pub(crate) fn zero_crossing_rate(
    y: &[f64],
    frame_length: usize,
    hop_length: usize,
) -> Result<Array2<f64>, FeatureError> {
    if y.is_empty() {
        return Err(FeatureError::EmptySignal);
    }
    let padded: Vec<f64> = pad_edge(y, frame_length / 2)
        .into_iter()
        .map(|v| if v.abs() <= ZERO_THRESHOLD { 0.0 } else { v })
        .collect();
    let values: Vec<f64> = (0..frame_count(padded.len(), frame_length, hop_length))
        .map(|t| {
            let frame = &padded[t * hop_length..t * hop_length + frame_length];
            let crossings = frame
                .windows(2)
                .filter(|w| w[0].is_sign_negative() != w[1].is_sign_negative())
                .count();
            crossings as f64 / frame_length as f64
        })
        .collect();
    Ok(Array1::from(values).insert_axis(Axis(0)))
}
