//! Fitted scalers

use ndarray::{ArrayD, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};

use super::{Transform, TransformError};

/// Learned scaler parameters, serializable for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerParams {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
    },
    Image {
        channel_min: [f64; 3],
        channel_max: [f64; 3],
        range: (f64, f64),
    },
}

impl ScalerParams {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransformError> {
        postcard::to_allocvec(self).map_err(|e| TransformError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransformError> {
        postcard::from_bytes(bytes).map_err(|e| TransformError::Serialization(e.to_string()))
    }

    /// Rebuild the fitted scaler these parameters describe
    pub fn into_transform(self) -> Result<Box<dyn Transform>, TransformError> {
        Ok(match self {
            ScalerParams::Standard { mean, scale } => Box::new(StandardScaler::new(mean, scale)?),
            ScalerParams::MinMax {
                data_min,
                data_max,
                feature_range,
            } => Box::new(MinMaxScaler::new(data_min, data_max, feature_range)?),
            ScalerParams::Image {
                channel_min,
                channel_max,
                range,
            } => Box::new(ImageScaler::new(channel_min, channel_max, range)),
        })
    }
}

/// Apply `f(feature_index, value)` along the trailing axis.
///
/// A single fitted feature applies to every element regardless of shape.
fn apply_per_feature<F>(
    input: ArrayViewD<'_, f64>,
    n_features: usize,
    f: F,
) -> Result<ArrayD<f64>, TransformError>
where
    F: Fn(usize, f64) -> f64,
{
    if n_features == 1 {
        return Ok(input.mapv(|v| f(0, v)));
    }
    let actual = input.shape().last().copied().unwrap_or(1);
    if input.ndim() == 0 || actual != n_features {
        return Err(TransformError::FeatureMismatch {
            expected: n_features,
            actual,
        });
    }

    let mut out = input.to_owned();
    let last = Axis(out.ndim() - 1);
    for mut lane in out.lanes_mut(last) {
        for (j, v) in lane.iter_mut().enumerate() {
            *v = f(j, *v);
        }
    }
    Ok(out)
}

/// Zero spreads would divide by zero, scale those features by 1 instead
fn guard_scale(values: Vec<f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|s| if s == 0.0 { 1.0 } else { s })
        .collect()
}

/// Standardization with a fitted per-feature mean and scale
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, TransformError> {
        if mean.is_empty() || mean.len() != scale.len() {
            return Err(TransformError::InvalidParams(format!(
                "mean has {} features, scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        Ok(Self {
            mean,
            scale: guard_scale(scale),
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn params(&self) -> ScalerParams {
        ScalerParams::Standard {
            mean: self.mean.clone(),
            scale: self.scale.clone(),
        }
    }
}

impl Transform for StandardScaler {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError> {
        apply_per_feature(input, self.n_features(), |j, v| (v - self.mean[j]) / self.scale[j])
    }
}

/// Min-max scaling of fitted per-feature bounds onto a feature range
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    feature_range: (f64, f64),
}

impl MinMaxScaler {
    pub fn new(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
    ) -> Result<Self, TransformError> {
        if data_min.is_empty() || data_min.len() != data_max.len() {
            return Err(TransformError::InvalidParams(format!(
                "data_min has {} features, data_max has {}",
                data_min.len(),
                data_max.len()
            )));
        }
        if feature_range.0 >= feature_range.1 {
            return Err(TransformError::InvalidParams(format!(
                "feature range {:?} is empty",
                feature_range
            )));
        }
        Ok(Self {
            data_min,
            data_max,
            feature_range,
        })
    }

    pub fn params(&self) -> ScalerParams {
        ScalerParams::MinMax {
            data_min: self.data_min.clone(),
            data_max: self.data_max.clone(),
            feature_range: self.feature_range,
        }
    }
}

impl Transform for MinMaxScaler {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError> {
        let spread = guard_scale(
            self.data_min
                .iter()
                .zip(&self.data_max)
                .map(|(lo, hi)| hi - lo)
                .collect(),
        );
        let (lo, hi) = self.feature_range;
        apply_per_feature(input, self.data_min.len(), |j, v| {
            (v - self.data_min[j]) / spread[j] * (hi - lo) + lo
        })
    }
}

/// Per-sample RGB image scaler.
///
/// Maps each channel from its fitted `[min, max]` onto `range`, clips to
/// `range` and replaces NaN (constant channels) with zero. Expects a
/// `(height, width, 3)` or flattened `(.., 3)` sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageScaler {
    channel_min: [f64; 3],
    channel_max: [f64; 3],
    range: (f64, f64),
}

impl ImageScaler {
    pub fn new(channel_min: [f64; 3], channel_max: [f64; 3], range: (f64, f64)) -> Self {
        Self {
            channel_min,
            channel_max,
            range,
        }
    }

    pub fn params(&self) -> ScalerParams {
        ScalerParams::Image {
            channel_min: self.channel_min,
            channel_max: self.channel_max,
            range: self.range,
        }
    }
}

impl Default for ImageScaler {
    fn default() -> Self {
        Self::new([0.0; 3], [255.0; 3], (0.0, 1.0))
    }
}

impl Transform for ImageScaler {
    fn transform(&self, input: ArrayViewD<'_, f64>) -> Result<ArrayD<f64>, TransformError> {
        let (lo, hi) = self.range;
        apply_per_feature(input, 3, |c, v| {
            let scaled = (v - self.channel_min[c]) / (self.channel_max[c] - self.channel_min[c])
                * (hi - lo)
                + lo;
            if scaled.is_nan() {
                0.0
            } else {
                scaled.clamp(lo, hi)
            }
        })
    }
}
