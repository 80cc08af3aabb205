//! Tensor containers produced by the builders

use std::fmt;

use ndarray::ArrayD;

/// Element type of a [`Tensor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    F32,
    F64,
    U8,
    I64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::U8 => "uint8",
            DType::I64 => "int64",
        };
        f.write_str(name)
    }
}

/// N-dimensional numeric array with a fixed element type
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    /// Continuous features
    F32(ArrayD<f32>),
    /// Native floating-point scalars and sequences
    F64(ArrayD<f64>),
    /// Pixels, one-hot vectors and masks
    U8(ArrayD<u8>),
    /// Label indices and token ids
    I64(ArrayD<i64>),
}

impl Tensor {
    pub fn shape(&self) -> &[usize] {
        match self {
            Tensor::F32(a) => a.shape(),
            Tensor::F64(a) => a.shape(),
            Tensor::U8(a) => a.shape(),
            Tensor::I64(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            Tensor::F32(_) => DType::F32,
            Tensor::F64(_) => DType::F64,
            Tensor::U8(_) => DType::U8,
            Tensor::I64(_) => DType::I64,
        }
    }

    /// Copy of the values widened to `f64`, same shape
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            Tensor::F32(a) => a.mapv(f64::from),
            Tensor::F64(a) => a.clone(),
            Tensor::U8(a) => a.mapv(f64::from),
            Tensor::I64(a) => a.mapv(|v| v as f64),
        }
    }

    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Tensor::F32(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Tensor::F64(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<&ArrayD<u8>> {
        match self {
            Tensor::U8(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            Tensor::I64(a) => Some(a),
            _ => None,
        }
    }
}

impl From<ArrayD<f32>> for Tensor {
    fn from(a: ArrayD<f32>) -> Self {
        Tensor::F32(a)
    }
}

impl From<ArrayD<f64>> for Tensor {
    fn from(a: ArrayD<f64>) -> Self {
        Tensor::F64(a)
    }
}

impl From<ArrayD<u8>> for Tensor {
    fn from(a: ArrayD<u8>) -> Self {
        Tensor::U8(a)
    }
}

impl From<ArrayD<i64>> for Tensor {
    fn from(a: ArrayD<i64>) -> Self {
        Tensor::I64(a)
    }
}

/// Output of `create`, input and output of `preprocess`.
///
/// Text defers encoding until `preprocess`, so its created value is the raw
/// string and its preprocess input is a batch of strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Tensor(Tensor),
    Text(Vec<String>),
}

impl ArrayData {
    pub fn kind(&self) -> &'static str {
        match self {
            ArrayData::Tensor(_) => "tensor",
            ArrayData::Text(_) => "text",
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            ArrayData::Tensor(t) => Some(t),
            ArrayData::Text(_) => None,
        }
    }

    pub fn into_tensor(self) -> Option<Tensor> {
        match self {
            ArrayData::Tensor(t) => Some(t),
            ArrayData::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            ArrayData::Text(t) => Some(t.as_slice()),
            ArrayData::Tensor(_) => None,
        }
    }
}

impl From<Tensor> for ArrayData {
    fn from(t: Tensor) -> Self {
        ArrayData::Tensor(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr1, IxDyn};

    #[test]
    fn test_shape_and_dtype() {
        let t = Tensor::U8(ArrayD::zeros(IxDyn(&[2, 3, 4])));
        assert_eq!(t.shape(), &[2, 3, 4]);
        assert_eq!(t.len(), 24);
        assert_eq!(t.dtype(), DType::U8);
        assert_eq!(t.dtype().to_string(), "uint8");
    }

    #[test]
    fn test_scalar_tensor() {
        let t = Tensor::F64(arr0(2.5).into_dyn());
        assert_eq!(t.ndim(), 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.to_f64()[IxDyn(&[])], 2.5);
    }

    #[test]
    fn test_widening() {
        let t = Tensor::I64(arr1(&[1, -2]).into_dyn());
        assert_eq!(t.to_f64(), arr1(&[1.0, -2.0]).into_dyn());
    }

    #[test]
    fn test_array_data_accessors() {
        let data = ArrayData::Text(vec!["a b".into()]);
        assert_eq!(data.kind(), "text");
        assert!(data.as_tensor().is_none());
        assert_eq!(data.as_text().unwrap().len(), 1);
    }
}
