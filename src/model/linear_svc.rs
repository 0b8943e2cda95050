use serde::Deserialize;

use super::{
    argmax, check_classes, check_width,
    vectorizer::{dot, Vectorizer},
    Classifier, ModelError,
};

// A two-class model may carry a single coefficient row; a positive score
// then selects the second class.
#[derive(Debug, Deserialize)]
pub struct LinearSvc {
    vectorizer: Vectorizer,
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
}

impl LinearSvc {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        self.vectorizer.validate()?;
        check_classes(&self.classes)?;
        let rows = self.coef.len();
        let binary = self.classes.len() == 2 && rows == 1;
        if !binary && rows != self.classes.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{rows} coefficient rows for {} classes",
                self.classes.len()
            )));
        }
        if self.intercept.len() != rows {
            return Err(ModelError::InvalidArtifact(format!(
                "{} intercepts for {rows} coefficient rows",
                self.intercept.len()
            )));
        }
        let width = self.vectorizer.width();
        for row in &self.coef {
            check_width("coef row", row, width)?;
        }
        Ok(())
    }

    fn decision_function(&self, text: &str) -> Vec<f64> {
        let features = self.vectorizer.transform(text);
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| dot(&features, row) + bias)
            .collect()
    }

    fn label(&self, scores: &[f64]) -> Option<String> {
        let idx = match scores {
            [score] if self.classes.len() == 2 => usize::from(*score > 0.0),
            _ => argmax(scores)?,
        };
        self.classes.get(idx).cloned()
    }
}

impl Classifier for LinearSvc {
    fn type_name(&self) -> &str {
        "LinearSVC"
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
                self.label(&self.decision_function(text))
                    .ok_or_else(|| ModelError::Scoring("no decision scores".to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_decision_uses_sign() {
        let svc: LinearSvc = serde_json::from_str(
            r#"{
                "vectorizer": {"vocabulary": {"great": 0, "awful": 1}},
                "classes": ["negative", "positive"],
                "coef": [[1.5, -1.5]],
                "intercept": [-0.1]
            }"#,
        )
        .unwrap();
        svc.validate().unwrap();
        assert_eq!(
            svc.classify(&["great", "awful", "meh"]).unwrap(),
            vec!["positive", "negative", "negative"]
        );
    }

    #[test]
    fn multiclass_takes_highest_score() {
        let svc: LinearSvc = serde_json::from_str(
            r#"{
                "vectorizer": {"vocabulary": {"great": 0, "awful": 1, "okay": 2}},
                "classes": ["negative", "neutral", "positive"],
                "coef": [[-1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, -1.0, 0.0]],
                "intercept": [0.0, 0.0, 0.0]
            }"#,
        )
        .unwrap();
        svc.validate().unwrap();
        assert_eq!(
            svc.classify(&["okay I guess", "awful"]).unwrap(),
            vec!["neutral", "negative"]
        );
    }

    #[test]
    fn mismatched_intercepts_fail_validation() {
        let svc: LinearSvc = serde_json::from_str(
            r#"{
                "vectorizer": {"vocabulary": {"great": 0}},
                "classes": ["negative", "positive"],
                "coef": [[1.0]],
                "intercept": []
            }"#,
        )
        .unwrap();
        assert!(svc.validate().is_err());
    }
}
