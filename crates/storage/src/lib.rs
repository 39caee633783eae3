use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use shared::{
    domain::{PersistedState, TrackingNumber},
    error::{ClassifiedError, ErrorCode},
};
use thiserror::Error;
use tracing::{debug, info};

pub const APP_DIR_NAME: &str = "parcel-tracker";
pub const STORE_FILE_NAME: &str = "tracking_numbers.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access tracking store '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("tracking store '{}' is not valid JSON: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode tracking store: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("no tracking number at position {index} (the list holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unable to resolve the user configuration directory; set HOME and retry")]
    NoConfigDir,
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ClassifiedError for StoreError {
    fn code(&self) -> ErrorCode {
        match self {
            StoreError::Io { .. } | StoreError::NoConfigDir => ErrorCode::Io,
            StoreError::Decode { .. } | StoreError::Encode(_) => ErrorCode::Decode,
            StoreError::IndexOutOfRange { .. } => ErrorCode::Index,
        }
    }
}

/// `<config dir>/parcel-tracker`, e.g. `~/.config/parcel-tracker` on Linux.
pub fn app_config_dir() -> Result<PathBuf, StoreError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(StoreError::NoConfigDir)
}

pub fn default_store_path() -> Result<PathBuf, StoreError> {
    Ok(app_config_dir()?.join(STORE_FILE_NAME))
}

/// Write-through JSON store of the user's tracking numbers.
///
/// Every mutation is a full read-modify-write of the document. Callers are
/// expected to issue one mutation at a time; nothing here guards against a
/// second process editing the same file.
#[derive(Debug, Clone)]
pub struct TrackingStore {
    path: PathBuf,
}

impl TrackingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Result<Self, StoreError> {
        Ok(Self::new(default_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Materializes an empty document if none exists, then loads it.
    pub async fn ensure_initialized(&self) -> Result<PersistedState, StoreError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;
        if !exists {
            self.save(&PersistedState::default()).await?;
            info!(path = %self.path.display(), "created empty tracking store");
        }
        self.load().await
    }

    pub async fn load(&self) -> Result<PersistedState, StoreError> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;
        serde_json::from_slice(&raw).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the whole document. The bytes land in a sibling temp file
    /// first and are renamed into place, so readers never see a torn write.
    pub async fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::io(parent, err))?;
        }

        let mut encoded = serde_json::to_vec_pretty(state).map_err(StoreError::Encode)?;
        encoded.push(b'\n');

        let staging = self.staging_path();
        tokio::fs::write(&staging, &encoded)
            .await
            .map_err(|err| StoreError::io(&staging, err))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| StoreError::io(&self.path, err))?;
        debug!(
            path = %self.path.display(),
            count = state.tracking_numbers.len(),
            "tracking store written"
        );
        Ok(())
    }

    pub async fn append(&self, number: TrackingNumber) -> Result<Vec<TrackingNumber>, StoreError> {
        let mut state = self.ensure_initialized().await?;
        info!(tracking_number = %number, "appending tracking number");
        state.tracking_numbers.push(number);
        self.save(&state).await?;
        Ok(state.tracking_numbers)
    }

    /// Removes the entry at zero-based `index`. A missing file counts as an
    /// empty list. An out-of-range index fails before the list is rewritten.
    pub async fn remove(&self, index: usize) -> Result<Vec<TrackingNumber>, StoreError> {
        let mut state = self.ensure_initialized().await?;
        let len = state.tracking_numbers.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        let removed = state.tracking_numbers.remove(index);
        info!(tracking_number = %removed, index, "removing tracking number");
        self.save(&state).await?;
        Ok(state.tracking_numbers)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(STORE_FILE_NAME));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
