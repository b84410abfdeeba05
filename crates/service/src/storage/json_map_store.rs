use std::{collections::BTreeMap, io::ErrorKind, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map.
///
/// Holds no state besides the path: every `load` reads the whole file and
/// every `save` rewrites it. Writes are plain overwrites, so a crash in the
/// middle of `save` can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonMapStore<K, V> {
    file_path: PathBuf,
    _marker: std::marker::PhantomData<fn() -> (K, V)>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _marker: std::marker::PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the full map. A missing file reads as an empty map.
    pub async fn load(&self) -> Result<BTreeMap<K, V>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(ServiceError::storage(format!("read {}: {e}", self.file_path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::storage(format!("parse {}: {e}", self.file_path.display())))
    }

    /// Overwrite the file with `map`, indented with four spaces.
    pub async fn save(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let data = to_indented_json(map)?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::storage(format!("write {}: {e}", self.file_path.display())))
    }
}

fn to_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ServiceError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(ServiceError::storage)?;
    Ok(buf)
}
