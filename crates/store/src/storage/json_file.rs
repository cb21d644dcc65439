use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::RwLock};
use tracing::warn;

use crate::errors::StoreError;

/// Generic JSON file-backed state cell.
///
/// Keeps a value of type `T` in memory behind a read/write lock and mirrors
/// it to a single JSON file. Every committed mutation rewrites the whole
/// file before it reports success, so the file always holds the last
/// committed state. Intended for small state where a database is overkill.
pub struct JsonFileStore<T> {
    inner: RwLock<T>,
    file_path: PathBuf,
}

impl<T> JsonFileStore<T>
where
    T: Default + Serialize + DeserializeOwned + Send + Sync,
{
    /// Open the store from a path, reading the current file content.
    ///
    /// A missing file is the fresh-start case; an unparsable file is
    /// absorbed the same way. Both yield `T::default()`, so opening never
    /// fails. The unparsable case is logged, and the bytes on disk stay
    /// untouched until the next successful commit overwrites them.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let value = match fs::read(&file_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        path = %file_path.display(),
                        error = %e,
                        "backing file unreadable, starting from defaults"
                    );
                    T::default()
                }
            },
            Err(_) => T::default(),
        };

        Arc::new(Self { inner: RwLock::new(value), file_path })
    }

    /// Run a read-only closure against the current state.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Apply a mutation and persist it as one transaction.
    ///
    /// The write lock is held across both the in-memory mutation and the
    /// file rewrite, so concurrent commits serialize and none can overwrite
    /// another's state. If the closure fails nothing is written; the cell
    /// does not roll back in-memory changes, so closures must bail out
    /// before touching the state. If the rewrite fails the error propagates
    /// and the caller must treat the mutation as not committed (memory and
    /// disk reconcile on the next successful commit).
    pub async fn commit<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut T) -> Result<R, StoreError>,
    {
        let mut guard = self.inner.write().await;
        let out = f(&mut guard)?;
        let bytes =
            serde_json::to_vec_pretty(&*guard).map_err(|e| StoreError::Persist(e.to_string()))?;
        write_atomic(&self.file_path, &bytes)
            .await
            .map_err(|e| StoreError::Persist(e.to_string()))?;
        Ok(out)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Atomic whole-file write: temp file in the same directory, fsync, rename.
/// A crash mid-write leaves the previous file intact.
pub async fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
    }
    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn write_atomic_replaces_content() -> Result<(), anyhow::Error> {
        let path = temp_path("atomic_write");
        write_atomic(&path, b"first").await?;
        assert_eq!(fs::read(&path).await?, b"first");
        write_atomic(&path, b"second").await?;
        assert_eq!(fs::read(&path).await?, b"second");
        // no temp file is left behind
        assert!(fs::metadata(path.with_extension("tmp")).await.is_err());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn open_missing_file_starts_empty_without_creating_it() {
        let path = temp_path("open_missing");
        let store = JsonFileStore::<HashMap<String, u32>>::open(&path).await;
        assert!(store.read(|m| m.is_empty()).await);
        // the file appears on the first commit, not at open
        assert!(fs::metadata(&path).await.is_err());
    }

    #[tokio::test]
    async fn open_corrupt_file_starts_empty_and_preserves_bytes() -> Result<(), anyhow::Error> {
        let path = temp_path("open_corrupt");
        fs::write(&path, b"{not json at all").await?;

        let store = JsonFileStore::<HashMap<String, u32>>::open(&path).await;
        assert!(store.read(|m| m.is_empty()).await);
        // corrupt bytes survive until the next successful commit
        assert_eq!(fs::read(&path).await?, b"{not json at all");

        store.commit(|m| { m.insert("a".into(), 1); Ok(()) }).await?;
        let reloaded = JsonFileStore::<HashMap<String, u32>>::open(&path).await;
        assert_eq!(reloaded.read(|m| m.get("a").copied()).await, Some(1));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn commit_persists_and_reloads() -> Result<(), anyhow::Error> {
        let path = temp_path("commit_roundtrip");
        let store = JsonFileStore::<HashMap<String, u32>>::open(&path).await;

        let doubled = store
            .commit(|m| {
                m.insert("x".into(), 21);
                Ok(m["x"] * 2)
            })
            .await?;
        assert_eq!(doubled, 42);

        let reloaded = JsonFileStore::<HashMap<String, u32>>::open(&path).await;
        assert_eq!(reloaded.read(|m| m.get("x").copied()).await, Some(21));

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_closure_writes_nothing() -> Result<(), anyhow::Error> {
        let path = temp_path("commit_aborts");
        let store = JsonFileStore::<HashMap<String, u32>>::open(&path).await;
        store.commit(|m| { m.insert("kept".into(), 1); Ok(()) }).await?;
        let before = fs::read(&path).await?;

        let res = store
            .commit(|m| {
                if !m.contains_key("missing") {
                    return Err::<(), _>(StoreError::not_found("thing"));
                }
                m.insert("never".into(), 2);
                Ok(())
            })
            .await;
        assert!(matches!(res, Err(StoreError::NotFound(_))));

        // memory and file are what the last successful commit left behind
        assert_eq!(store.read(|m| m.len()).await, 1);
        assert_eq!(fs::read(&path).await?, before);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }
}
