//! Whole-file JSON persistence shared by the stores.

use crate::error::StorageError;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// Reads `path`, initializing it with `T::default()` when the file does not exist.
///
/// A file that exists but fails to parse, including an empty one, is reported as
/// [`StorageError::Corrupt`] and left untouched on disk.
pub(crate) async fn load_or_init<T>(path: &Path) -> Result<T, StorageError>
where
    T: DeserializeOwned + Serialize + Default,
{
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return init_default(path).await;
        }
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

async fn init_default<T>(path: &Path) -> Result<T, StorageError>
where
    T: Serialize + Default,
{
    let value = T::default();
    write_atomic(path, &value).await?;
    info!(path = %path.display(), "Initialized empty store file");
    Ok(value)
}

/// Writes `value` as pretty JSON to a sibling temp file, then renames it over `path`.
pub(crate) async fn write_atomic<T>(path: &Path, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::io(parent, e))?;
    }

    let payload = serde_json::to_vec_pretty(value)?;

    let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
    if let Err(e) = write_synced(&temp_path, &payload).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::io(&temp_path, e));
    }
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::io(path, e));
    }

    debug!(path = %path.display(), bytes = payload.len(), "Store file written");
    Ok(())
}

/// Writes `payload` and flushes it to disk before returning.
async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.sync_all().await
}
