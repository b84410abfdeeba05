//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the listener is bound.

use std::path::Path;

use tracing::{info, warn};

/// Make sure the directory holding the accounts file exists and report
/// whether the file itself is present. A missing file is not an error: it
/// reads as an empty account set.
pub async fn ensure_env(accounts_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = accounts_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    match tokio::fs::metadata(accounts_path).await {
        Ok(meta) if meta.is_file() => {
            info!(path = %accounts_path.display(), "accounts file found");
        }
        Ok(_) => {
            return Err(anyhow::anyhow!("{} exists but is not a file", accounts_path.display()));
        }
        Err(_) => {
            warn!(path = %accounts_path.display(), "accounts file not found; every account lookup will 404");
        }
    }
    Ok(())
}
