//! Persistent storage on the local filesystem.

use crate::error::{Error, Result};
use crate::Store;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Store that keeps each name as a plain text file under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`. The directory is created lazily on the
    /// first write.
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a store name to its file path.
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !is_plain {
            return Err(Error::InvalidName(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Store for FileStore {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_of(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| Error::NotUtf8(path.display().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, text: &str) -> Result<bool> {
        if text.is_empty() {
            crate::warn_empty_write(name);
            return Ok(false);
        }
        let path = self.path_of(name)?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!(directory = %parent.display(), "created store directory");
            }
        }
        std::fs::write(&path, text)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "wrote record");
        Ok(true)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_of(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_of(name)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn storage_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());

        let text = "Format,pluribusunum\n  peer,http://a.example/receiver.csv \r\n\n";
        assert!(store.write("receiver/receiver_0.csv", text).unwrap());
        assert_eq!(
            store.read("receiver/receiver_0.csv").unwrap().as_deref(),
            Some(text)
        );
        assert!(dir.path().join("receiver").is_dir());
    }

    #[test]
    fn missing_reads_as_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("not-yet"));

        assert_eq!(store.read("x.csv").unwrap(), None);
        assert!(!store.exists("x.csv").unwrap());
    }

    #[test]
    fn empty_write_is_noop() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());

        assert!(!store.write("receiver/receiver_1.csv", "").unwrap());
        assert!(!dir.path().join("receiver").exists());

        store.write("a.txt", "keep").unwrap();
        assert!(!store.write("a.txt", "").unwrap());
        assert_eq!(store.read("a.txt").unwrap().as_deref(), Some("keep"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());

        store.write("write_next_when.txt", "3010").unwrap();
        store.remove("write_next_when.txt").unwrap();
        store.remove("write_next_when.txt").unwrap();
        assert!(!store.exists("write_next_when.txt").unwrap());
    }

    #[test]
    fn rejects_escaping_names() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path());

        assert!(matches!(store.read("../etc/passwd"), Err(Error::InvalidName(_))));
        assert!(matches!(store.write("/tmp/x", "y"), Err(Error::InvalidName(_))));
        assert!(matches!(store.read(""), Err(Error::InvalidName(_))));
    }
}
