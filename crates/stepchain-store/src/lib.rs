//! Stepchain Record Store
//!
//! Durable storage for named blobs of text plus the shared read-through cache
//! the resolver keeps in front of it.
//!
//! # Contract
//!
//! - `read` returns `None` for a name that was never written.
//! - `write` creates parent containers as needed.
//! - `write` refuses empty text: an empty result is never persisted, so a
//!   failed resolution cannot masquerade as a cached empty answer.
//!
//! Names are `/`-separated relative paths such as `receiver/receiver_7.csv`.

mod cache;
mod error;
mod file;
mod memory;

pub use cache::TextCache;
pub use error::{Error, Result};
pub use file::FileStore;
pub use memory::MemoryStore;

/// A persistent key-value text store.
pub trait Store: Send + Sync {
    /// Read the text stored under `name`, or `None` if absent.
    fn read(&self, name: &str) -> Result<Option<String>>;

    /// Write `text` under `name`.
    ///
    /// Returns `false` (after logging a warning) when `text` is empty and
    /// nothing was written.
    fn write(&self, name: &str, text: &str) -> Result<bool>;

    /// Delete `name`. Deleting an absent name is not an error.
    fn remove(&self, name: &str) -> Result<()>;

    /// Check whether `name` holds a record.
    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.read(name)?.is_some())
    }
}

pub(crate) fn warn_empty_write(name: &str) {
    tracing::warn!(name, "refusing to write blank text");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn memory_roundtrip_is_byte_identical(name in "[a-z]{1,8}/[a-z]{1,8}\\.csv", text in "\\PC{1,64}") {
            let store = MemoryStore::new();
            prop_assert!(store.write(&name, &text).unwrap());
            prop_assert_eq!(store.read(&name).unwrap(), Some(text));
        }
    }

    #[test]
    fn empty_write_leaves_store_unchanged() {
        let store = MemoryStore::new();
        store.write("a.txt", "kept").unwrap();

        assert!(!store.write("a.txt", "").unwrap());
        assert!(!store.write("b.txt", "").unwrap());

        assert_eq!(store.read("a.txt").unwrap().as_deref(), Some("kept"));
        assert!(!store.exists("b.txt").unwrap());
    }
}
