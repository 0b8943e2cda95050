//! Smoke tests against the bundled demo artefact.

use std::path::Path;

use sentisage::{handle::ModelHandle, loader};

fn demo() -> ModelHandle {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sentiment_analysis_model.json");
    loader::load(&path).unwrap()
}

fn label(model: &ModelHandle, text: &str) -> String {
    model
        .invoke(|m| m.classify(&[text]))
        .unwrap()
        .remove(0)
}

#[test]
fn positive_prediction() {
    let model = demo();
    assert_eq!(label(&model, "This product is amazing, I highly recommend it!"), "positive");
}

#[test]
fn negative_prediction() {
    let model = demo();
    assert_eq!(
        label(&model, "The service was terrible and I will never use it again."),
        "negative"
    );
}

#[test]
fn confidence_is_a_probability() {
    let model = demo();
    let row = model
        .invoke(|m| {
            let estimator = m
                .probability_estimator()
                .expect("demo model estimates probabilities");
            estimator.predict_proba(&["This product is fine."])
        })
        .unwrap()
        .remove(0);
    let confidence = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((0.0..=1.0).contains(&confidence));
}
