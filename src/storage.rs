// File: ./src/storage.rs
// Durable storage for the favorites collection.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the Recipe wire shape require incrementing FAVORITES_STORAGE_VERSION
// below and teaching `parse_favorites` how to read the previous layout.
use crate::context::AppContext;
use crate::model::Recipe;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key of the persisted record. The file is `<data dir>/favorites-storage.json`.
pub const FAVORITES_STORAGE_NAME: &str = "favorites-storage";

// Version history:
// - v0: browser export, `{"state":{"favorites":[...]},"version":0}`. Same layout as v1.
// - v1: current
const FAVORITES_STORAGE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct FavoritesState {
    #[serde(default)]
    favorites: Vec<Recipe>,
}

/// Versioned on-disk envelope.
#[derive(Serialize, Deserialize)]
struct FavoritesData {
    state: FavoritesState,
    #[serde(default)]
    version: u32,
}

/// Backing medium for the favorites collection. Whole-collection reads and writes.
pub trait FavoritesStorage: Send + Sync {
    fn load(&self) -> Result<Vec<Recipe>>;
    fn save(&self, favorites: &[Recipe]) -> Result<()>;
}

/// Low level file helpers shared by the favorites file and the config file.
pub struct LocalStorage;

impl LocalStorage {
    /// Sidecar lock file: `favorites-storage.json` -> `favorites-storage.json.lock`
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive advisory lock for `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: write to a .tmp sibling then rename over the target.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

/// Parses any layout this build understands.
fn parse_favorites(json: &str) -> Result<Vec<Recipe>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    // Unversioned: a bare array of recipes.
    if value.is_array() {
        log::info!(
            "Migrating unversioned favorites to v{}",
            FAVORITES_STORAGE_VERSION
        );
        return Ok(serde_json::from_value(value)?);
    }

    let data: FavoritesData = serde_json::from_value(value)
        .context("Favorites file is neither a versioned record nor a recipe list")?;
    if data.version > FAVORITES_STORAGE_VERSION {
        anyhow::bail!(
            "Favorites storage version {} is newer than supported version {}",
            data.version,
            FAVORITES_STORAGE_VERSION
        );
    }
    Ok(data.state.favorites)
}

fn serialize_favorites(favorites: &[Recipe]) -> Result<String> {
    let data = FavoritesData {
        state: FavoritesState {
            favorites: favorites.to_vec(),
        },
        version: FAVORITES_STORAGE_VERSION,
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

/// JSON file on local disk, guarded by a lock file and written atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_context(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self::new(ctx.get_favorites_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for FileStorage {
    fn load(&self) -> Result<Vec<Recipe>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        LocalStorage::with_lock(&self.path, || {
            let json = fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read {:?}", self.path))?;
            parse_favorites(&json).with_context(|| format!("Failed to parse {:?}", self.path))
        })
    }

    fn save(&self, favorites: &[Recipe]) -> Result<()> {
        LocalStorage::with_lock(&self.path, || {
            let json = serialize_favorites(favorites)?;
            LocalStorage::atomic_write(&self.path, json)?;
            Ok(())
        })
    }
}

/// In-process storage. Clones share the same slot, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    favorites: Vec<Recipe>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorites(favorites: Vec<Recipe>) -> Self {
        let storage = Self::default();
        if let Ok(mut slot) = storage.inner.lock() {
            slot.favorites = favorites;
        }
        storage
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|slot| slot.saves).unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<Recipe> {
        self.inner
            .lock()
            .map(|slot| slot.favorites.clone())
            .unwrap_or_default()
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Recipe>> {
        let slot = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        Ok(slot.favorites.clone())
    }

    fn save(&self, favorites: &[Recipe]) -> Result<()> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        slot.favorites = favorites.to_vec();
        slot.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    fn recipes(n: usize) -> Vec<Recipe> {
        (0..n)
            .map(|i| Recipe::new(format!("{}", 52700 + i), format!("Recipe {}", i)))
            .collect()
    }

    #[test]
    fn test_atomic_write_and_load() {
        let ctx = TestContext::new();
        let file_path = ctx.root.join("test.json");

        LocalStorage::atomic_write(&file_path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "[]");
        assert!(!file_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_lock_path_appends_suffix() {
        let p = LocalStorage::get_lock_path(Path::new("/tmp/favorites-storage.json"));
        assert_eq!(p, PathBuf::from("/tmp/favorites-storage.json.lock"));
        let p = LocalStorage::get_lock_path(Path::new("/tmp/favorites"));
        assert_eq!(p, PathBuf::from("/tmp/favorites.lock"));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let ctx = TestContext::new();
        let storage = FileStorage::from_context(&ctx).unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_roundtrip_preserves_order() {
        let ctx = TestContext::new();
        let storage = FileStorage::from_context(&ctx).unwrap();
        let saved = recipes(5);
        storage.save(&saved).unwrap();

        let loaded = FileStorage::from_context(&ctx).unwrap().load().unwrap();
        assert_eq!(loaded, saved);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], FAVORITES_STORAGE_VERSION);
        assert_eq!(raw["state"]["favorites"][0]["idMeal"], "52700");
    }

    #[test]
    fn test_reads_browser_export() {
        let json = r#"{"state":{"favorites":[{"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole","strMealThumb":"t.jpg"}]},"version":0}"#;
        let favorites = parse_favorites(json).unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "52772");
    }

    #[test]
    fn test_reads_unversioned_array() {
        let json = r#"[{"idMeal":"1","strMeal":"A","strMealThumb":""},{"idMeal":"2","strMeal":"B","strMealThumb":""}]"#;
        let favorites = parse_favorites(json).unwrap();
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites[1].name, "B");

        let single = parse_favorites(r#"[{"idMeal":"7","strMeal":"C"}]"#).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].id, "7");
    }

    #[test]
    fn test_rejects_future_version() {
        let json = r#"{"state":{"favorites":[]},"version":99}"#;
        let err = parse_favorites(json).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let ctx = TestContext::new();
        let storage = FileStorage::from_context(&ctx).unwrap();
        fs::write(storage.path(), "{ not json").unwrap();
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_memory_storage_shares_state_between_clones() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.save(&recipes(2)).unwrap();
        assert_eq!(handle.snapshot().len(), 2);
        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.load().unwrap(), recipes(2));
    }
}
