use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Load this client's stable participant id, creating one on first use.
///
/// Identity is generated client-side and persisted across sessions; the
/// server never hands out ids and only sees them as opaque strings.
pub fn load_or_create(path: &Path) -> Result<String> {
    if path.exists() {
        let id = fs::read_to_string(path)
            .with_context(|| format!("Failed to read identity file {}", path.display()))?;
        let id = id.trim().to_string();
        if !id.is_empty() {
            return Ok(id);
        }
    }

    let id = Uuid::new_v4().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create identity directory {}", parent.display()))?;
    }
    fs::write(path, &id)
        .with_context(|| format!("Failed to write identity file {}", path.display()))?;

    info!(%id, "created participant identity");
    Ok(id)
}
