use crate::ports::outbound::storage::{Storage, StorageError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keys are paths relative to `base_dir`.
pub struct FileSystem {
    base_dir: PathBuf,
}

impl FileSystem {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

#[async_trait]
impl Storage for FileSystem {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(why) if why.kind() == ErrorKind::NotFound => Ok(None),
            Err(why) => Err(StorageError::new(format!("could not read {key}: {why}"))),
        }
    }

    /// Writes to a sibling temp file first so a crash never leaves a
    /// half-written cache file behind.
    async fn write(&self, key: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|why| StorageError::new(format!("could not create {}: {why}", parent.display())))?;
        }

        let temp = path.with_extension("tmp");
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|why| StorageError::new(format!("could not write {key}: {why}")))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|why| StorageError::new(format!("could not replace {key}: {why}")))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        tokio::fs::try_exists(self.path(key))
            .await
            .map_err(|why| StorageError::new(format!("could not check {key}: {why}")))
    }

    async fn export(&self, key: &str, destination: &Path) -> Result<(), StorageError> {
        let source = self.path(key);
        let file_name = source
            .file_name()
            .ok_or_else(|| StorageError::new(format!("{key} has no file name")))?;

        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|why| StorageError::new(format!("could not create {}: {why}", destination.display())))?;
        tokio::fs::copy(&source, destination.join(file_name))
            .await
            .map_err(|why| StorageError::new(format!("could not export {key}: {why}")))?;

        Ok(())
    }
}
