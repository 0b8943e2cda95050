use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use tracing::info;

// single GET, no retry
pub async fn fetch_model(url: &str, dest: &Path, timeout: Duration) -> Result<u64> {
    if let Some(dir) = dest.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    info!(%url, "Downloading model artefact");
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    tokio::fs::write(dest, &body)
        .await
        .with_context(|| format!("writing {}", dest.display()))?;
    info!(dest = %dest.display(), size = body.len(), "Model artefact downloaded");

    Ok(body.len() as u64)
}
