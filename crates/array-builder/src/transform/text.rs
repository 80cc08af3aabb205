//! Fitted text encoders

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TransformError;

/// Characters stripped from text before splitting into words
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Fitted text encoder.
///
/// Implementors provide the operations they support; the rest report
/// [`TransformError::Unsupported`].
pub trait TextTransform: Send + Sync {
    /// Token ids of `text`
    fn sequence(&self, _text: &str) -> Result<Vec<i64>, TransformError> {
        Err(TransformError::Unsupported("sequence"))
    }

    /// Fixed-width indicator vector of `text`
    fn bag_of_words(&self, _text: &str) -> Result<Vec<f32>, TransformError> {
        Err(TransformError::Unsupported("bag_of_words"))
    }

    /// Embedding of a single word, `None` when it is not in the vocabulary
    fn word_vector(&self, _word: &str) -> Result<Option<Vec<f32>>, TransformError> {
        Err(TransformError::Unsupported("word_vector"))
    }
}

/// Word-index tokenizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokenizer {
    /// Word to id, ids start at 1 (0 is padding)
    word_index: HashMap<String, usize>,
    /// Only ids below this are kept
    num_words: Option<usize>,
    /// Characters replaced by spaces before splitting
    filters: String,
    /// Lower-case before splitting
    lower: bool,
}

impl Tokenizer {
    pub fn new(word_index: HashMap<String, usize>) -> Self {
        Self {
            word_index,
            num_words: None,
            filters: DEFAULT_FILTERS.to_string(),
            lower: true,
        }
    }

    /// Index words in the given order, most frequent first by convention
    pub fn from_vocabulary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let word_index = words
            .into_iter()
            .enumerate()
            .map(|(i, w)| (w.into(), i + 1))
            .collect();
        Self::new(word_index)
    }

    pub fn with_num_words(mut self, num_words: usize) -> Self {
        self.num_words = Some(num_words);
        self
    }

    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    pub fn with_lower(mut self, lower: bool) -> Self {
        self.lower = lower;
        self
    }

    /// Width of the bag-of-words vector
    pub fn vocabulary_width(&self) -> usize {
        self.num_words.unwrap_or(self.word_index.len() + 1)
    }

    fn words(&self, text: &str) -> Vec<String> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let cleaned: String = text
            .chars()
            .map(|c| if self.filters.contains(c) { ' ' } else { c })
            .collect();
        cleaned
            .split(' ')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn ids(&self, text: &str) -> Vec<usize> {
        self.words(text)
            .iter()
            .filter_map(|w| self.word_index.get(w).copied())
            .filter(|&i| self.num_words.map_or(true, |n| i < n))
            .collect()
    }
}

impl TextTransform for Tokenizer {
    fn sequence(&self, text: &str) -> Result<Vec<i64>, TransformError> {
        Ok(self.ids(text).into_iter().map(|i| i as i64).collect())
    }

    fn bag_of_words(&self, text: &str) -> Result<Vec<f32>, TransformError> {
        let width = self.vocabulary_width();
        let mut row = vec![0.0; width];
        for i in self.ids(text) {
            if i < width {
                row[i] = 1.0;
            }
        }
        Ok(row)
    }
}

/// Word-to-vector lookup table with a fixed vector width
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordVectors {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl WordVectors {
    pub fn new(dim: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dim,
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<(), TransformError> {
        if vector.len() != self.dim {
            return Err(TransformError::InvalidParams(format!(
                "vector has {} components, table width is {}",
                vector.len(),
                self.dim
            )));
        }
        self.vectors.insert(word.into(), vector);
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl TextTransform for WordVectors {
    fn word_vector(&self, word: &str) -> Result<Option<Vec<f32>>, TransformError> {
        Ok(self.vectors.get(word).cloned())
    }
}
