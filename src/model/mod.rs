use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

mod linear_svc;
mod naive_bayes;
mod vectorizer;

pub use linear_svc::LinearSvc;
pub use naive_bayes::MultinomialNb;
pub use vectorizer::Vectorizer;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("empty input batch")]
    EmptyBatch,
    #[error("invalid model artefact: {0}")]
    InvalidArtifact(String),
    #[error("{0}")]
    Scoring(String),
}

pub trait Classifier: Send + Sync {
    fn type_name(&self) -> &str;

    fn classes(&self) -> Option<&[String]> {
        None
    }

    fn classify(&self, batch: &[&str]) -> Result<Vec<String>, ModelError>;

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        None
    }
}

pub trait ProbabilityEstimator {
    /// One row per input text, one column per class in `classes()` order.
    fn predict_proba(&self, batch: &[&str]) -> Result<Vec<Vec<f64>>, ModelError>;
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    MultinomialNb(MultinomialNb),
    LinearSvc(LinearSvc),
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::InvalidArtifact(e.to_string()))
    }

    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, ModelError> {
        match self {
            ModelArtifact::MultinomialNb(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
            ModelArtifact::LinearSvc(model) => {
                model.validate()?;
                Ok(Arc::new(model))
            }
        }
    }
}

// first maximum wins ties
pub(crate) fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

pub(crate) fn check_classes(classes: &[String]) -> Result<(), ModelError> {
    if classes.is_empty() {
        return Err(ModelError::InvalidArtifact("model has no classes".to_string()));
    }
    Ok(())
}

pub(crate) fn check_width(what: &str, row: &[f64], width: usize) -> Result<(), ModelError> {
    if row.len() != width {
        return Err(ModelError::InvalidArtifact(format!(
            "{what} has {} features, vocabulary has {width}",
            row.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_first_of_ties() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some(1));
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = ModelArtifact::from_slice(br#"{"kind": "random_forest"}"#).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
    }

    #[test]
    fn artifact_dispatches_on_kind() {
        let json = br#"{
            "kind": "linear_svc",
            "vectorizer": {"vocabulary": {"good": 0, "bad": 1}},
            "classes": ["negative", "positive"],
            "coef": [[1.0, -1.0]],
            "intercept": [0.0]
        }"#;
        let model = ModelArtifact::from_slice(json).unwrap().into_classifier().unwrap();
        assert_eq!(model.type_name(), "LinearSVC");
        assert!(model.probability_estimator().is_none());
        assert_eq!(model.classify(&["good stuff"]).unwrap(), vec!["positive"]);
    }
}
