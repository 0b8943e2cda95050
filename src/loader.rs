use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;

use crate::{
    handle::ModelHandle,
    model::{ModelArtifact, ModelError},
};

const SELF_TEST_INPUT: &str = "test";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("model file is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("failed to read model: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to deserialise model: {0}")]
    Deserialize(#[source] ModelError),
    #[error("model self-test failed: {0}")]
    SelfTest(#[source] ModelError),
}

pub fn load(path: &Path) -> Result<ModelHandle, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let size = fs::metadata(path)?.len();
    info!(path = %path.display(), size, "loading model");
    if size == 0 {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let classifier = ModelArtifact::from_slice(&bytes)
        .and_then(ModelArtifact::into_classifier)
        .map_err(LoadError::Deserialize)?;
    let handle = ModelHandle::new(classifier);
    info!(model_type = handle.type_name(), "model loaded");

    self_test(&handle)?;
    Ok(handle)
}

// result is only logged
pub fn self_test(handle: &ModelHandle) -> Result<(), LoadError> {
    let labels = handle
        .invoke(|model| model.classify(&[SELF_TEST_INPUT]))
        .map_err(LoadError::SelfTest)?;
    info!(?labels, "model self-test");
    Ok(())
}
