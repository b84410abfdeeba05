//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the accounts file location is usable; warn when the file is missing.
pub async fn ensure_env(accounts_path: &Path) -> anyhow::Result<()> {
    common::env::ensure_env(accounts_path).await
}
