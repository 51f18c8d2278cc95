//! Export of all saved locations to a JSON file.

use std::path::{Path, PathBuf};

use skydeck_backend::ProfileClient;
use skydeck_core::AppError;

/// File name the export lands under, matching what users already expect
/// from the download flow.
pub const EXPORT_FILE_NAME: &str = "weather_locations.json";

/// Fetch the backend export document and write it to `dir`.
///
/// The document is a passthrough of the backend's profile list: parsed only
/// to pretty-print it with 2-space indentation, never transformed.
pub async fn export_locations(client: &ProfileClient, dir: &Path) -> Result<PathBuf, AppError> {
    let document = client.export_profiles().await?;

    let body = serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::Other(anyhow::anyhow!("Failed to serialize export: {}", e)))?;

    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, body)?;

    tracing::info!("Exported locations to {}", path.display());
    Ok(path)
}
