use crate::ports::outbound::storage::{Storage, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Storage kept in a map, for exercising the stores without touching disk.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn with_file(key: &str, contents: &str) -> Self {
        let storage = Self::default();
        storage.put(key, contents);
        storage
    }

    pub fn put(&self, key: &str, contents: &str) {
        self.files
            .lock()
            .expect("poisoned")
            .insert(key.to_string(), contents.as_bytes().to_vec());
    }

    pub fn contents(&self, key: &str) -> Option<String> {
        self.files
            .lock()
            .expect("poisoned")
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.files.lock().expect("poisoned").get(key).cloned())
    }

    async fn write(&self, key: &str, contents: &[u8]) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .expect("poisoned")
            .insert(key.to_string(), contents.to_vec());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.files.lock().expect("poisoned").contains_key(key))
    }

    async fn export(&self, key: &str, destination: &Path) -> Result<(), StorageError> {
        let contents = self
            .read(key)
            .await?
            .ok_or_else(|| StorageError::new(format!("{key} does not exist")))?;
        let file_name = Path::new(key)
            .file_name()
            .ok_or_else(|| StorageError::new(format!("{key} has no file name")))?;
        self.files.lock().expect("poisoned").insert(
            destination.join(file_name).to_string_lossy().into_owned(),
            contents,
        );
        Ok(())
    }
}
