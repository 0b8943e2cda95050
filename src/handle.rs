use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::{Arc, OnceLock},
};

use tracing::{error, warn};

use crate::{
    loader,
    model::{Classifier, ModelError},
};

#[derive(Clone)]
pub struct ModelHandle {
    classifier: Arc<dyn Classifier>,
}

impl ModelHandle {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn type_name(&self) -> &str {
        self.classifier.type_name()
    }

    pub fn classes(&self) -> Option<&[String]> {
        self.classifier.classes()
    }

    /// Runs `f` against the model, turning a panic inside it into a
    /// [`ModelError::Scoring`].
    pub fn invoke<T>(
        &self,
        f: impl FnOnce(&dyn Classifier) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let classifier = self.classifier.as_ref();
        match panic::catch_unwind(AssertUnwindSafe(|| f(classifier))) {
            Ok(result) => result,
            Err(payload) => Err(ModelError::Scoring(format!(
                "model panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("type_name", &self.type_name())
            .field("classes", &self.classes())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Process-wide model slot. Filled at most once during startup and only
/// read after that; an empty slot means the service runs without a model.
#[derive(Debug, Default)]
pub struct ModelSlot {
    cell: OnceLock<ModelHandle>,
}

impl ModelSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn loaded(handle: ModelHandle) -> Self {
        let slot = Self::default();
        slot.install(handle);
        slot
    }

    /// Attempts a single load from `path`. Failure is logged and leaves the
    /// slot empty for the rest of the process.
    pub fn from_path(path: &Path) -> Self {
        match loader::load(path) {
            Ok(handle) => Self::loaded(handle),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load model, serving without it");
                Self::empty()
            }
        }
    }

    pub fn install(&self, handle: ModelHandle) -> bool {
        let installed = self.cell.set(handle).is_ok();
        if !installed {
            warn!("model slot already filled, ignoring second model");
        }
        installed
    }

    pub fn get(&self) -> Option<&ModelHandle> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
