use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::ModelError;

/// Tokens are runs of two or more alphanumeric or `_` characters; tokens
/// missing from the vocabulary are dropped.
#[derive(Debug, Deserialize)]
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default)]
    binary: bool,
    #[serde(default)]
    l2_normalize: bool,
}

fn default_lowercase() -> bool {
    true
}

impl Vectorizer {
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.vocabulary.is_empty() {
            return Err(ModelError::InvalidArtifact("vocabulary is empty".to_string()));
        }
        let width = self.width();
        if let Some((token, idx)) = self.vocabulary.iter().find(|&(_, &idx)| idx >= width) {
            return Err(ModelError::InvalidArtifact(format!(
                "token {token:?} has index {idx}, vocabulary has {width} entries"
            )));
        }
        Ok(())
    }

    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens(text) {
            let hit = if self.lowercase {
                self.vocabulary.get(&token.to_lowercase())
            } else {
                self.vocabulary.get(token)
            };
            if let Some(&idx) = hit {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        if self.binary {
            counts.values_mut().for_each(|v| *v = 1.0);
        }
        if self.l2_normalize {
            let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                counts.values_mut().for_each(|v| *v /= norm);
            }
        }
        counts.into_iter().collect()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
}

pub(crate) fn dot(features: &[(usize, f64)], weights: &[f64]) -> f64 {
    features
        .iter()
        .map(|&(idx, value)| value * weights.get(idx).copied().unwrap_or(0.0))
        .sum()
}
