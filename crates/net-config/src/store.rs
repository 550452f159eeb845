//! Netplan file storage

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use tokio::fs;

use netcfg_core::PersistenceError;

/// Default netplan configuration directory
pub const NETPLAN_DIR: &str = "/etc/netplan";

/// File name used when the netplan directory holds no file yet
pub const DEFAULT_NETPLAN_FILE: &str = "01-networkcfg.yaml";

/// Destination for the rendered netplan document
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Path the next document should be written to
    async fn destination(&self) -> Result<PathBuf, PersistenceError>;

    /// Write the rendered document to `path`
    async fn write_config(&self, path: &Path, contents: &str) -> Result<(), PersistenceError>;
}

/// Stores the document in a netplan directory.
///
/// An existing file is reused (the first by name) so that a hand-installed
/// netplan file gets replaced instead of shadowed by a second one.
#[derive(Debug, Clone)]
pub struct NetplanDirStore {
    dir: PathBuf,
    default_file: String,
}

impl NetplanDirStore {
    /// Store in `/etc/netplan`
    pub fn new() -> Self {
        Self::with_dir(NETPLAN_DIR)
    }

    /// Store in a custom directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            default_file: DEFAULT_NETPLAN_FILE.to_string(),
        }
    }

    /// Override the file name used for an empty directory
    pub fn with_default_file(mut self, file_name: impl Into<String>) -> Self {
        self.default_file = file_name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_dir(&self) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PersistenceError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    async fn existing_files(&self) -> Result<Vec<String>, PersistenceError> {
        let read_dir_err = |source: std::io::Error| PersistenceError::ReadDir {
            path: self.dir.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.dir).await.map_err(read_dir_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
            let file_type = entry.file_type().await.map_err(read_dir_err)?;
            if file_type.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Default for NetplanDirStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for NetplanDirStore {
    async fn destination(&self) -> Result<PathBuf, PersistenceError> {
        self.ensure_dir().await?;

        let file_name = self
            .existing_files()
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| self.default_file.clone());

        let path = self.dir.join(file_name);
        debug!("Netplan destination: {}", path.display());
        Ok(path)
    }

    async fn write_config(&self, path: &Path, contents: &str) -> Result<(), PersistenceError> {
        self.ensure_dir().await?;

        fs::write(path, contents)
            .await
            .map_err(|source| PersistenceError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Wrote network configuration to {}", path.display());
        Ok(())
    }
}
