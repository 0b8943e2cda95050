use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::{handle::ModelSlot, model::ModelError};

pub const SERVICE_NAME: &str = "Sentiment Analysis API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const FALLBACK_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model not available")]
    Unavailable,
    #[error("text is empty")]
    InvalidInput,
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub sentiment: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub message: String,
    pub version: String,
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct PredictionService {
    model: ModelSlot,
}

impl PredictionService {
    pub fn new(model: ModelSlot) -> Self {
        Self { model }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn predict(&self, text: &str) -> Result<PredictionResponse, ServiceError> {
        // availability before input validity
        let handle = self.model.get().ok_or(ServiceError::Unavailable)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::InvalidInput);
        }

        let scored = handle.invoke(|model| {
            let batch = [text];
            let sentiment = model
                .classify(&batch)?
                .into_iter()
                .next()
                .ok_or_else(|| ModelError::Scoring("model returned no label".to_string()))?;
            let confidence = match model.probability_estimator() {
                Some(estimator) => {
                    let row = estimator
                        .predict_proba(&batch)?
                        .into_iter()
                        .next()
                        .ok_or_else(|| {
                            ModelError::Scoring("model returned no probabilities".to_string())
                        })?;
                    row.into_iter()
                        .reduce(f64::max)
                        .ok_or_else(|| ModelError::Scoring("empty probability row".to_string()))?
                }
                None => FALLBACK_CONFIDENCE,
            };
            Ok(PredictionResponse {
                sentiment,
                confidence,
            })
        });

        match scored {
            Ok(response) => {
                info!(
                    sentiment = %response.sentiment,
                    confidence = %format!("{:.2}", response.confidence),
                    "prediction complete"
                );
                Ok(response)
            }
            Err(e) => {
                error!(error = %e, "prediction failed");
                Err(ServiceError::Internal(e.to_string()))
            }
        }
    }

    pub fn status(&self) -> Status {
        Status {
            message: SERVICE_NAME.to_string(),
            version: VERSION.to_string(),
            status: "running".to_string(),
            model_loaded: self.model_loaded(),
        }
    }

    /// Liveness only: reports healthy whether or not a model is loaded.
    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            model_loaded: self.model_loaded(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn model_info(&self) -> Result<ModelInfo, ServiceError> {
        let handle = self.model.get().ok_or(ServiceError::Unavailable)?;
        Ok(ModelInfo {
            model_type: handle.type_name().to_string(),
            model_loaded: true,
            classes: handle.classes().map(<[String]>::to_vec),
        })
    }
}
