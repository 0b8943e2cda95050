use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    config::ServeConfig,
    handle::ModelSlot,
    service::{
        Health, ModelInfo, PredictionRequest, PredictionResponse, PredictionService, ServiceError,
        Status, SERVICE_NAME,
    },
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InvalidInput => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

pub fn router(service: Arc<PredictionService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/model/info", get(model_info))
        .with_state(service)
}

async fn root(State(service): State<Arc<PredictionService>>) -> Json<Status> {
    Json(service.status())
}

async fn health(State(service): State<Arc<PredictionService>>) -> Json<Health> {
    Json(service.health())
}

async fn predict(
    State(service): State<Arc<PredictionService>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    // scoring is CPU-bound, keep it off the reactor
    let response = tokio::task::spawn_blocking(move || service.predict(&request.text))
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))??;
    Ok(Json(response))
}

async fn model_info(
    State(service): State<Arc<PredictionService>>,
) -> Result<Json<ModelInfo>, ServiceError> {
    service.model_info().map(Json)
}

// the model slot is settled before the listener accepts a connection
pub async fn serve(config: &ServeConfig) -> Result<()> {
    info!("Starting {SERVICE_NAME}");
    let model_path = config.model_path.clone();
    let slot = tokio::task::spawn_blocking(move || ModelSlot::from_path(&model_path)).await?;
    let service = Arc::new(PredictionService::new(slot));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, model_loaded = service.model_loaded(), "Listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
