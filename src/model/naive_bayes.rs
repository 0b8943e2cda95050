use serde::Deserialize;

use super::{
    argmax, check_classes, check_width,
    vectorizer::{dot, Vectorizer},
    Classifier, ModelError, ProbabilityEstimator,
};

#[derive(Debug, Deserialize)]
pub struct MultinomialNb {
    vectorizer: Vectorizer,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        self.vectorizer.validate()?;
        check_classes(&self.classes)?;
        let n = self.classes.len();
        if self.class_log_prior.len() != n || self.feature_log_prob.len() != n {
            return Err(ModelError::InvalidArtifact(format!(
                "expected {n} class priors and feature rows, got {} and {}",
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }
        let width = self.vectorizer.width();
        for row in &self.feature_log_prob {
            check_width("feature_log_prob row", row, width)?;
        }
        check_log_probs("class_log_prior", &self.class_log_prior)?;
        for row in &self.feature_log_prob {
            check_log_probs("feature_log_prob", row)?;
        }
        Ok(())
    }

    fn joint_log_likelihood(&self, text: &str) -> Vec<f64> {
        let features = self.vectorizer.transform(text);
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + dot(&features, row))
            .collect()
    }
}

impl Classifier for MultinomialNb {
    fn type_name(&self) -> &str {
        "MultinomialNB"
    }

    fn classes(&self) -> Option<&[String]> {
        Some(&self.classes)
    }

    fn classify(&self, batch: &[&str]) -> Result<Vec<String>, ModelError> {
        if batch.is_empty() {
            return Err(ModelError::EmptyBatch);
        }
        batch
            .iter()
            .map(|text| {
                argmax(&self.joint_log_likelihood(text))
                    .map(|i| self.classes[i].clone())
                    .ok_or_else(|| ModelError::Scoring("no class scores".to_string()))
            })
            .collect()
    }

    fn probability_estimator(&self) -> Option<&dyn ProbabilityEstimator> {
        Some(self)
    }
}

impl ProbabilityEstimator for MultinomialNb {
    fn predict_proba(&self, batch: &[&str]) -> Result<Vec<Vec<f64>>, ModelError> {
        if batch.is_empty() {
            return Err(ModelError::EmptyBatch);
        }
        batch
            .iter()
            .map(|text| softmax(&self.joint_log_likelihood(text)))
            .collect()
    }
}

// log probabilities are finite and at most zero
fn check_log_probs(what: &str, values: &[f64]) -> Result<(), ModelError> {
    match values.iter().find(|v| !v.is_finite() || **v > 0.0) {
        Some(bad) => Err(ModelError::InvalidArtifact(format!(
            "{what} contains {bad}, expected a finite log probability"
        ))),
        None => Ok(()),
    }
}

fn softmax(log_scores: &[f64]) -> Result<Vec<f64>, ModelError> {
    if log_scores.is_empty() || log_scores.iter().any(|s| !s.is_finite()) {
        return Err(ModelError::Scoring(format!(
            "cannot normalise log likelihoods {log_scores:?}"
        )));
    }
    let max = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    Ok(exp.into_iter().map(|e| e / total).collect())
}
