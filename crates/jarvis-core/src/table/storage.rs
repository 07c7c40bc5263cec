use super::Table;
use crate::error::{JarvisError, Result};
use crate::io::{atomic_write, ensure_dir};
use crate::paths;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where tables live.
///
/// `mutate` is the only write path: the closure sees a copy of the table and
/// the copy is persisted only when the closure returns `Ok`. Every call runs
/// under the implementation's lock, so read-check-write sequences inside one
/// closure are atomic with respect to other callers in the process.
pub trait TableStorage: Send + Sync {
    fn table_names(&self) -> Result<Vec<String>>;

    fn get(&self, name: &str) -> Result<Table>;

    fn mutate(&self, name: &str, f: &mut dyn FnMut(&mut Table) -> Result<()>) -> Result<()>;

    /// Create `table` unless one with the same name exists. Returns whether it
    /// was created.
    fn create(&self, table: Table) -> Result<bool>;
}

/// Run a value-returning closure through [`TableStorage::mutate`].
pub fn mutate_with<R, F>(storage: &dyn TableStorage, name: &str, f: F) -> Result<R>
where
    F: FnOnce(&mut Table) -> Result<R>,
{
    let mut f = Some(f);
    let mut out = None;
    storage.mutate(name, &mut |table| {
        if let Some(f) = f.take() {
            out = Some(f(table)?);
        }
        Ok(())
    })?;
    out.ok_or_else(|| JarvisError::MutationSkipped(name.to_string()))
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<BTreeMap<String, Table>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        let map = tables.into_iter().map(|t| (t.name.clone(), t)).collect();
        Self {
            tables: Mutex::new(map),
        }
    }
}

impl TableStorage for MemoryStorage {
    fn table_names(&self) -> Result<Vec<String>> {
        let tables = self.tables.lock().map_err(|_| JarvisError::StorageLock)?;
        Ok(tables.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Table> {
        let tables = self.tables.lock().map_err(|_| JarvisError::StorageLock)?;
        tables
            .get(name)
            .cloned()
            .ok_or_else(|| JarvisError::TableNotFound(name.to_string()))
    }

    fn mutate(&self, name: &str, f: &mut dyn FnMut(&mut Table) -> Result<()>) -> Result<()> {
        let mut tables = self.tables.lock().map_err(|_| JarvisError::StorageLock)?;
        let current = tables
            .get(name)
            .ok_or_else(|| JarvisError::TableNotFound(name.to_string()))?;
        let mut working = current.clone();
        f(&mut working)?;
        tables.insert(name.to_string(), working);
        Ok(())
    }

    fn create(&self, table: Table) -> Result<bool> {
        let mut tables = self.tables.lock().map_err(|_| JarvisError::StorageLock)?;
        if tables.contains_key(&table.name) {
            return Ok(false);
        }
        tables.insert(table.name.clone(), table);
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Workbook directory
// ---------------------------------------------------------------------------

/// One YAML file per table under `.jarvis/tables/`.
#[derive(Debug)]
pub struct WorkbookStorage {
    root: PathBuf,
    lock: Mutex<()>,
}

impl WorkbookStorage {
    /// Open an initialized workbook rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        if !paths::jarvis_dir(root).is_dir() {
            return Err(JarvisError::NotInitialized);
        }
        Ok(Self {
            root: root.to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    /// Create the workbook directories (idempotent) and open it.
    pub fn init(root: &Path) -> Result<Self> {
        ensure_dir(&paths::tables_dir(root))?;
        Self::open(root)
    }

    fn read(&self, name: &str) -> Result<Table> {
        paths::validate_table_name(name)?;
        let path = paths::table_path(&self.root, name);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(JarvisError::TableNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let mut table: Table = serde_yaml::from_str(&data)?;
        table.name = name.to_string();
        Ok(table)
    }

    fn write(&self, table: &Table) -> Result<()> {
        let data = serde_yaml::to_string(table)?;
        atomic_write(&paths::table_path(&self.root, &table.name), data.as_bytes())
    }
}

impl TableStorage for WorkbookStorage {
    fn table_names(&self) -> Result<Vec<String>> {
        let dir = paths::tables_dir(&self.root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(paths::TABLE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn get(&self, name: &str) -> Result<Table> {
        let _guard = self.lock.lock().map_err(|_| JarvisError::StorageLock)?;
        self.read(name)
    }

    fn mutate(&self, name: &str, f: &mut dyn FnMut(&mut Table) -> Result<()>) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| JarvisError::StorageLock)?;
        let mut table = self.read(name)?;
        f(&mut table)?;
        self.write(&table)
    }

    fn create(&self, table: Table) -> Result<bool> {
        paths::validate_table_name(&table.name)?;
        let _guard = self.lock.lock().map_err(|_| JarvisError::StorageLock)?;
        if paths::table_path(&self.root, &table.name).exists() {
            return Ok(false);
        }
        self.write(&table)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;
    use tempfile::TempDir;

    fn tones() -> Table {
        Table::new("ToneLibrary", ["Tone ID", "Tone Name"])
    }

    #[test]
    fn memory_mutate_discards_on_error() {
        let storage = MemoryStorage::with_tables([tones()]);
        let err = storage.mutate("ToneLibrary", &mut |t| {
            t.rows.push(vec![Cell::from("T-01")]);
            Err(JarvisError::InvalidPayload("nope".into()))
        });
        assert!(err.is_err());
        assert!(storage.get("ToneLibrary").unwrap().rows.is_empty());
    }

    #[test]
    fn memory_missing_table() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.get("Nope"),
            Err(JarvisError::TableNotFound(_))
        ));
    }

    #[test]
    fn mutate_with_returns_value() {
        let storage = MemoryStorage::with_tables([tones()]);
        let n = mutate_with(&storage, "ToneLibrary", |t| {
            t.rows.push(vec![Cell::from("T-01")]);
            Ok(t.rows.len())
        })
        .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn workbook_open_requires_init() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            WorkbookStorage::open(dir.path()),
            Err(JarvisError::NotInitialized)
        ));
    }

    #[test]
    fn workbook_persists_tables() {
        let dir = TempDir::new().unwrap();
        let storage = WorkbookStorage::init(dir.path()).unwrap();
        assert!(storage.create(tones()).unwrap());
        assert!(!storage.create(tones()).unwrap());

        storage
            .mutate("ToneLibrary", &mut |t| {
                t.rows.push(vec![Cell::from("T-01"), Cell::from("Dry")]);
                Ok(())
            })
            .unwrap();

        let reopened = WorkbookStorage::open(dir.path()).unwrap();
        let table = reopened.get("ToneLibrary").unwrap();
        assert_eq!(table.rows, vec![vec![Cell::from("T-01"), Cell::from("Dry")]]);
        assert_eq!(reopened.table_names().unwrap(), vec!["ToneLibrary"]);
    }

    #[test]
    fn workbook_rejects_unsafe_names() {
        let dir = TempDir::new().unwrap();
        let storage = WorkbookStorage::init(dir.path()).unwrap();
        assert!(matches!(
            storage.get("../config"),
            Err(JarvisError::InvalidTableName(_))
        ));
    }
}
