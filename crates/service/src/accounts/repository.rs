use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::accounts::domain::{Account, Accounts};
use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// Wholesale persistence of the account map.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn load_accounts(&self) -> Result<Accounts, ServiceError>;
    async fn save_accounts(&self, accounts: &Accounts) -> Result<(), ServiceError>;
}

/// Accounts kept in a single JSON file, re-read on every call.
#[derive(Debug, Clone)]
pub struct FileAccountRepository {
    store: JsonMapStore<String, Account>,
}

impl FileAccountRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonMapStore::new(path) }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

#[async_trait]
impl AccountRepository for FileAccountRepository {
    async fn load_accounts(&self) -> Result<Accounts, ServiceError> {
        self.store.load().await
    }

    async fn save_accounts(&self, accounts: &Accounts) -> Result<(), ServiceError> {
        self.store.save(accounts).await
    }
}
