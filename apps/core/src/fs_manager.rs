use crate::error::AppError;
use crate::settings::AppSettings;
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Resolves the on-disk layout used by the file-backed store.
#[derive(Debug, Clone)]
pub struct PortablePathManager {
    root: PathBuf,
}

impl PortablePathManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root taken from settings, falling back to `./data` under the working directory.
    pub fn from_settings(settings: &AppSettings) -> Self {
        match &settings.data_dir {
            Some(dir) => Self::new(dir.clone()),
            None => {
                let cwd = std::env::current_dir().unwrap_or_else(|e| {
                    warn!("Failed to get current directory: {}. Using relative path.", e);
                    PathBuf::from(".")
                });
                Self::new(cwd.join("data"))
            }
        }
    }

    /// Main data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.root.clone()
    }

    /// Key-value blobs (./data/store).
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Creates the data and store directories if they don't exist.
    pub fn init(&self) -> Result<(), std::io::Error> {
        for path in [self.data_dir(), self.store_dir()] {
            if !path.exists() {
                info!("Creating directory: {:?}", path);
                fs::create_dir_all(&path)?;
            }
        }
        Ok(())
    }
}

/// Builds the store selected by settings: file-backed when a data directory
/// is configured, in-memory otherwise.
pub fn open_store(settings: &AppSettings) -> Result<Arc<dyn KeyValueStore>, AppError> {
    match settings.data_dir {
        Some(_) => {
            let paths = PortablePathManager::from_settings(settings);
            paths.init()?;
            Ok(Arc::new(FileStore::open(paths.store_dir())?))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
