//! Directory-backed storage.
//!
//! Each key maps to `<dir>/<encoded key>.json`. Writes go to a uniquely named
//! temporary file in the same directory which is then renamed over the
//! target, so a crash mid-write leaves the previous value intact and
//! concurrent writers never share a temporary file.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{CartStorage, StorageError};

/// JSON files in a directory. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File holding the value for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Map a key onto a portable file name.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_xx`
/// (lowercase hex), so distinct keys never share a file.
fn file_stem(key: &str) -> String {
    key.bytes().fold(String::with_capacity(key.len()), |mut stem, byte| {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{byte:02x}"));
        }
        stem
    })
}

/// Write `value` to `target` through a temporary file in `dir`.
fn write_atomically(dir: &Path, target: &Path, value: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

impl CartStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let dir = self.dir.clone();
        let target = self.path_for(key);
        let value = value.to_owned();

        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &value))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_file_stem_encodes_key() {
        assert_eq!(file_stem("@RocketShoes:cart"), "_40RocketShoes_3acart");
        assert_eq!(file_stem("plain-key1"), "plain-key1");
    }

    #[test]
    fn test_distinct_keys_use_distinct_files() {
        let storage = FileStorage::new("carts");
        assert_ne!(
            storage.path_for("@RocketShoes:cart"),
            storage.path_for("_RocketShoes_cart")
        );
        assert_ne!(storage.path_for("a:b"), storage.path_for("a_b"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert!(storage.get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let storage = FileStorage::new(dir.path());
        storage.set("@RocketShoes:cart", "[1]").await.unwrap();
        storage.set("@RocketShoes:cart", "[1,2]").await.unwrap();

        let reopened = FileStorage::new(dir.path());
        assert_eq!(
            reopened.get("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[1,2]")
        );
        // Only the target file remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_a_complete_value() {
        let dir = tempfile::tempdir().unwrap();
        let first = Arc::new(FileStorage::new(dir.path()));
        let second = Arc::new(FileStorage::new(dir.path()));

        let writes = (0..16).map(|i| {
            let storage = if i % 2 == 0 {
                Arc::clone(&first)
            } else {
                Arc::clone(&second)
            };
            tokio::spawn(async move {
                storage
                    .set("@RocketShoes:cart", &format!("[{i}]"))
                    .await
                    .unwrap();
            })
        });
        for write in writes.collect::<Vec<_>>() {
            write.await.unwrap();
        }

        let value = first.get("@RocketShoes:cart").await.unwrap().unwrap();
        let written: Vec<u32> = serde_json::from_str(&value).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
