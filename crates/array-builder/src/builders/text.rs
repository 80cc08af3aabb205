//! Text arrays
//!
//! `create` defers encoding and hands the raw string back; `preprocess`
//! encodes a batch of strings with the fitted text transform.

use ndarray::{Array, Array2, Array3};
use tracing::{debug, trace};

use super::{expect_text, ArrayBuilder};
use crate::error::ArrayError;
use crate::modality::Modality;
use crate::parameters::{TextMode, TextParameters, TextProcessing};
use crate::source::Source;
use crate::tensor::{ArrayData, Tensor};
use crate::transform::TextTransform;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextArray;

/// Right-pad with zeros to `len`, cutting longer sequences when `truncate`
fn pad_sequence(mut ids: Vec<i64>, len: usize, truncate: bool) -> Vec<i64> {
    if ids.len() < len {
        ids.resize(len, 0);
    } else if truncate {
        ids.truncate(len);
    }
    ids
}

/// Stack equal-width rows into `(rows, width)`.
///
/// Rows of differing widths are reported as a shape mismatch against the
/// first row's width.
fn stack_rows<T>(rows: Vec<Vec<T>>) -> Result<Array2<T>, ArrayError> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|r| r.len() != width) {
        return Err(ArrayError::ShapeMismatch {
            modality: Modality::Text,
            expected: vec![width],
            actual: vec![bad.len()],
        });
    }
    let n = rows.len();
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    Array::from_shape_vec((n, width), flat).map_err(|_| ArrayError::ShapeMismatch {
        modality: Modality::Text,
        expected: vec![n, width],
        actual: vec![],
    })
}

impl TextArray {
    fn embedding(
        texts: &[String],
        transform: &dyn TextTransform,
        params: &TextParameters,
    ) -> Result<Tensor, ArrayError> {
        let (len, truncate) = match params.mode {
            TextMode::Full => (params.max_words, true),
            TextMode::LengthAndStep => (params.length, false),
        };
        let rows = texts
            .iter()
            .map(|t| {
                transform
                    .sequence(t)
                    .map(|ids| pad_sequence(ids, len, truncate))
                    .map_err(ArrayError::transform(Modality::Text))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tensor::I64(stack_rows(rows)?.into_dyn()))
    }

    fn bag_of_words(texts: &[String], transform: &dyn TextTransform) -> Result<Tensor, ArrayError> {
        let rows = texts
            .iter()
            .map(|t| transform.bag_of_words(t).map_err(ArrayError::transform(Modality::Text)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Tensor::F32(stack_rows(rows)?.into_dyn()))
    }

    /// One `(length, size)` matrix of word vectors per text.
    ///
    /// Words missing from the table become zero vectors; texts longer than
    /// `length` words keep every word and fail the final stack.
    fn word_to_vec(
        texts: &[String],
        transform: &dyn TextTransform,
        params: &TextParameters,
    ) -> Result<Tensor, ArrayError> {
        let size = params.word2vec_size;
        let mut samples = Vec::with_capacity(texts.len());

        for text in texts {
            let mut vectors = Vec::new();
            for word in text.split(' ') {
                let vector = match transform
                    .word_vector(word)
                    .map_err(ArrayError::transform(Modality::Text))?
                {
                    Some(v) => v,
                    None => {
                        trace!("Word {:?} not in vocabulary, using zero vector", word);
                        vec![0.0; size]
                    }
                };
                if vector.len() != size {
                    return Err(ArrayError::ShapeMismatch {
                        modality: Modality::Text,
                        expected: vec![size],
                        actual: vec![vector.len()],
                    });
                }
                vectors.push(vector);
            }
            if vectors.len() < params.length {
                vectors.resize(params.length, vec![0.0; size]);
            }
            samples.push(vectors);
        }

        let words = samples.first().map_or(params.length, Vec::len);
        if let Some(bad) = samples.iter().find(|s| s.len() != words) {
            return Err(ArrayError::ShapeMismatch {
                modality: Modality::Text,
                expected: vec![words, size],
                actual: vec![bad.len(), size],
            });
        }
        let n = samples.len();
        let flat: Vec<f32> = samples.into_iter().flatten().flatten().collect();
        let array = Array3::from_shape_vec((n, words, size), flat).map_err(|_| {
            ArrayError::ShapeMismatch {
                modality: Modality::Text,
                expected: vec![n, words, size],
                actual: vec![],
            }
        })?;
        Ok(Tensor::F32(array.into_dyn()))
    }
}

impl ArrayBuilder for TextArray {
    type Params = TextParameters;
    type Fitted = dyn TextTransform;

    fn modality(&self) -> Modality {
        Modality::Text
    }

    fn create(&self, source: &Source, _params: &TextParameters) -> Result<ArrayData, ArrayError> {
        let text = expect_text(Modality::Text, source)?;
        Ok(ArrayData::Text(vec![text.to_string()]))
    }

    fn preprocess(
        &self,
        data: ArrayData,
        transform: &dyn TextTransform,
        params: &TextParameters,
    ) -> Result<ArrayData, ArrayError> {
        let texts = match data {
            ArrayData::Text(texts) => texts,
            ArrayData::Tensor(_) => {
                return Err(ArrayError::UnexpectedData {
                    modality: Modality::Text,
                    expected: "text",
                    actual: "tensor",
                })
            }
        };
        let tensor = match params.preprocessing {
            TextProcessing::Embedding => Self::embedding(&texts, transform, params)?,
            TextProcessing::BagOfWords => Self::bag_of_words(&texts, transform)?,
            TextProcessing::WordToVec => Self::word_to_vec(&texts, transform, params)?,
        };
        debug!(
            "Encoded {} texts as {:?} ({:?})",
            texts.len(),
            tensor.shape(),
            params.preprocessing
        );
        Ok(ArrayData::Tensor(tensor))
    }
}
