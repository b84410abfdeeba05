#![cfg(test)]
use std::path::PathBuf;

/// Unique path under the system temp dir; the file itself is not created.
pub fn temp_json_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
}

/// Write a raw accounts document and return its path.
pub async fn seed_accounts(prefix: &str, json: serde_json::Value) -> Result<PathBuf, anyhow::Error> {
    let path = temp_json_path(prefix);
    tokio::fs::write(&path, serde_json::to_vec_pretty(&json)?).await?;
    Ok(path)
}
