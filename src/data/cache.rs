use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::loader::load_file;
use super::model::RideTable;
use crate::error::DataSourceResult;

/// Loads one source file at most once and hands out the shared table.
///
/// The load runs while the cell's lock is held, so concurrent first callers
/// wait for a single read instead of racing. A failed load leaves the cell
/// empty.
#[derive(Debug)]
pub struct DatasetLoader {
    path: PathBuf,
    cell: Mutex<Option<Arc<RideTable>>>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetLoader {
            path: path.into(),
            cell: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded table, reading the source on first use.
    pub fn load(&self) -> DataSourceResult<Arc<RideTable>> {
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = cell.as_ref() {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_file(&self.path)?);
        *cell = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Whether the source has already been read successfully.
    pub fn is_loaded(&self) -> bool {
        self.cell
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
