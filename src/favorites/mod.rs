//! Favorites persistence.
//!
//! Favorites live in a single named slot holding a JSON array of recipe
//! ids. Reading never fails: a missing or corrupt slot simply yields an
//! empty set. Writing overwrites the whole slot.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::ErrorKind;
use thiserror::Error;
use tracing::{debug, warn};

mod model;

pub use model::Favorites;

/// Name of the storage slot holding the favorites array.
pub const FAVORITES_SLOT: &str = "little-chef-favorites-v1";

/// Errors that can occur when writing favorites.
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Failed to write favorites to {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed favorites slot at `<dir>/little-chef-favorites-v1.json`.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    path: Utf8PathBuf,
}

impl FavoritesStore {
    /// Creates a store whose slot lives in `dir`.
    ///
    /// Nothing is touched on disk until [`persist`](Self::persist) runs.
    pub fn new(dir: impl AsRef<Utf8Path>) -> Self {
        FavoritesStore {
            path: dir.as_ref().join(format!("{FAVORITES_SLOT}.json")),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads the persisted favorites.
    ///
    /// A missing slot, an unreadable file or malformed JSON all produce an
    /// empty set; the last two are logged.
    pub fn load(&self) -> Favorites {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path, "no saved favorites");
                return Favorites::new();
            }
            Err(e) => {
                warn!(path = %self.path, error = %e, "failed to read favorites, starting empty");
                return Favorites::new();
            }
        };

        match serde_json::from_str::<Favorites>(&content) {
            Ok(favorites) => {
                debug!(count = favorites.len(), "loaded favorites");
                favorites
            }
            Err(e) => {
                warn!(path = %self.path, error = %e, "failed to parse favorites, starting empty");
                Favorites::new()
            }
        }
    }

    /// Overwrites the slot with `favorites`.
    ///
    /// The data is written to a sibling temporary file and renamed into
    /// place, so readers see either the old or the new array.
    pub fn persist(&self, favorites: &Favorites) -> Result<(), FavoritesError> {
        let encoded = serde_json::to_string(favorites)?;
        let write_err = |source| FavoritesError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, encoded).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }

        debug!(count = favorites.len(), path = %self.path, "saved favorites");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FavoritesStore {
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        FavoritesStore::new(path)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let set = Favorites::new();
        let added = set.toggle("pancakes");
        assert!(added.contains("pancakes"));
        assert_eq!(added.len(), 1);

        let removed = added.toggle("pancakes");
        assert!(removed.is_empty());
        // the original is untouched
        assert!(added.contains("pancakes"));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let sets = [
            Favorites::new(),
            Favorites::from_iter(["a"]),
            Favorites::from_iter(["a", "b", "c"]),
        ];
        for set in &sets {
            for id in ["a", "b", "z"] {
                assert_eq!(&set.toggle(id).toggle(id), set, "id {id}");
            }
        }
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_persist_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let favorites = Favorites::from_iter(["2", "1"]);

        store.persist(&favorites).unwrap();
        assert_eq!(store.load(), favorites);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["1","2"]"#);
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.persist(&Favorites::from_iter(["1", "2"])).unwrap();
        store.persist(&Favorites::from_iter(["3"])).unwrap();
        assert_eq!(store.load(), Favorites::from_iter(["3"]));
    }

    #[test]
    fn test_load_corrupt_slot_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for garbage in ["not json", r#"{"ids": ["1"]}"#, "[1, 2]", ""] {
            fs::write(store.path(), garbage).unwrap();
            assert!(store.load().is_empty(), "content {garbage:?}");
        }
    }

    #[test]
    fn test_persist_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = Utf8PathBuf::from_path_buf(dir.path().join("a/b")).unwrap();
        let store = FavoritesStore::new(&nested);

        store.persist(&Favorites::from_iter(["x"])).unwrap();
        assert!(store.load().contains("x"));
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        // a regular file where the directory should be
        let store = FavoritesStore::new(Utf8PathBuf::from_path_buf(blocker).unwrap());

        let err = store.persist(&Favorites::from_iter(["x"])).unwrap_err();
        assert!(matches!(err, FavoritesError::Write { .. }));
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        // a non-empty directory sitting where the slot file goes
        fs::create_dir_all(store.path().join("occupied")).unwrap();

        let err = store.persist(&Favorites::from_iter(["x"])).unwrap_err();
        assert!(matches!(err, FavoritesError::Write { .. }));
        assert!(!store.path().with_extension("json.tmp").exists());
    }
}
