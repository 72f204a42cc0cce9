use std::{
    fs, io,
    path::{Path, PathBuf},
};

use market_core::UserLedger;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file io failed: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not valid user state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("background save task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Load/save boundary for the persisted user ledger.
pub trait StateStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<UserLedger>, StoreError>;
    fn save(&self, ledger: &UserLedger) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self.path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<UserLedger>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, ledger: &UserLedger) -> Result<(), StoreError> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, serde_json::to_vec_pretty(ledger)?)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// A missing or unreadable state file starts the user from the default ledger.
pub fn load_or_default(store: &impl StateStore) -> UserLedger {
    match store.load() {
        Ok(Some(ledger)) => {
            info!("restored saved user state");
            ledger
        }
        Ok(None) => {
            info!("no saved user state, starting fresh");
            UserLedger::default()
        }
        Err(err) => {
            warn!(error = %err, "ignoring unreadable user state");
            UserLedger::default()
        }
    }
}
