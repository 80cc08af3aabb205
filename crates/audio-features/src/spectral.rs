//! Spectral shape features over a magnitude spectrogram

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Fraction of spectral energy below the rolloff frequency
pub(crate) const ROLL_PERCENT: f64 = 0.85;

/// Column divided by its L1 norm; near-silent columns are left untouched
fn l1_normalized(column: ArrayView1<'_, f64>) -> Array1<f64> {
    let norm: f64 = column.iter().map(|v| v.abs()).sum();
    if norm < f64::MIN_POSITIVE {
        column.to_owned()
    } else {
        column.mapv(|v| v / norm)
    }
}

/// Weighted mean frequency per frame, shape `(1, frames)`
pub(crate) fn centroid(magnitude: &Array2<f64>, freqs: &[f64]) -> Array2<f64> {
    let values: Vec<f64> = magnitude
        .axis_iter(Axis(1))
        .map(|column| frame_centroid(&l1_normalized(column), freqs))
        .collect();
    row(values)
}

fn frame_centroid(normalized: &Array1<f64>, freqs: &[f64]) -> f64 {
    normalized.iter().zip(freqs).map(|(s, f)| s * f).sum()
}

/// Second-order spread around the centroid per frame, shape `(1, frames)`
pub(crate) fn bandwidth(magnitude: &Array2<f64>, freqs: &[f64]) -> Array2<f64> {
    let values: Vec<f64> = magnitude
        .axis_iter(Axis(1))
        .map(|column| {
            let normalized = l1_normalized(column);
            let centre = frame_centroid(&normalized, freqs);
            normalized
                .iter()
                .zip(freqs)
                .map(|(s, f)| s * (f - centre).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    row(values)
}

/// Lowest frequency whose cumulative magnitude reaches [`ROLL_PERCENT`] of the
/// frame total, shape `(1, frames)`
pub(crate) fn rolloff(magnitude: &Array2<f64>, freqs: &[f64]) -> Array2<f64> {
    let values: Vec<f64> = magnitude
        .axis_iter(Axis(1))
        .map(|column| {
            let total: f64 = column.sum();
            let threshold = ROLL_PERCENT * total;
            let mut cumulative = 0.0;
            for (s, &f) in column.iter().zip(freqs) {
                cumulative += s;
                if cumulative >= threshold {
                    return f;
                }
            }
            freqs.last().copied().unwrap_or(0.0)
        })
        .collect();
    row(values)
}

fn row(values: Vec<f64>) -> Array2<f64> {
    Array1::from(values).insert_axis(Axis(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_centroid_of_single_peak() {
        let freqs = [0.0, 100.0, 200.0, 300.0];
        let mag = array![[0.0], [0.0], [2.0], [0.0]];
        let c = centroid(&mag, &freqs);
        assert_eq!(c.dim(), (1, 1));
        assert!((c[[0, 0]] - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_bandwidth_of_two_peaks() {
        let freqs = [0.0, 100.0, 200.0];
        let mag = array![[1.0], [0.0], [1.0]];
        // centroid 100, each peak 100 away with weight 0.5
        assert!((bandwidth(&mag, &freqs)[[0, 0]] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolloff_threshold() {
        let freqs = [0.0, 10.0, 20.0, 30.0];
        let mag = array![[0.5], [0.3], [0.1], [0.1]];
        // cumulative 0.5, 0.8, 0.9 -> first reaching 0.85 is bin 2
        assert_eq!(rolloff(&mag, &freqs)[[0, 0]], 20.0);
    }

    #[test]
    fn test_silent_frame() {
        let freqs = [0.0, 10.0, 20.0];
        let mag = Array2::zeros((3, 2));
        assert!(centroid(&mag, &freqs).iter().all(|&v| v == 0.0));
        assert!(rolloff(&mag, &freqs).iter().all(|&v| v == 0.0));
    }
}
