//! Local filesystem snapshot store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Snapshot store backed by a single local JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a store writing to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Absolute form of the store path, for unambiguous logs.
    fn display_path(&self) -> PathBuf {
        std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self) -> Snapshot {
        let shown = self.display_path();
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Snapshot>(&bytes) {
                Ok(snapshot) => {
                    log::info!(
                        "Loaded snapshot with {} products from {}",
                        snapshot.len(),
                        shown.display()
                    );
                    snapshot
                }
                Err(error) => {
                    log::warn!(
                        "Snapshot at {} is unreadable ({}), starting fresh",
                        shown.display(),
                        error
                    );
                    Snapshot::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No snapshot at {} yet, first run expected",
                    shown.display()
                );
                Snapshot::new()
            }
            Err(error) => {
                log::warn!(
                    "Snapshot at {} could not be read ({}), starting fresh",
                    shown.display(),
                    error
                );
                Snapshot::new()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Saved snapshot with {} products to {}",
            snapshot.len(),
            self.display_path().display()
        );
        Ok(())
    }
}
