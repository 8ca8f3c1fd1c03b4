//! File-backed schema with reload on change.
//!
//! A [`SchemaSource`] parses its document on first use and again only when
//! the file's modification time moves past the one seen at the last load.
//! The check-and-load runs under one lock, so concurrent callers arriving
//! for the same change wait for a single parse instead of repeating it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::{load_schema, LoadError, LoadResult, Schema};

#[derive(Debug)]
struct Loaded {
    schema: Arc<Schema>,
    modified: SystemTime,
}

/// Lazily loaded, reload-on-change schema document.
#[derive(Debug)]
pub struct SchemaSource {
    path: PathBuf,
    loaded: Mutex<Option<Loaded>>,
}

impl SchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current schema, (re)loading the document if it changed.
    pub fn schema(&self) -> LoadResult<Arc<Schema>> {
        let mut loaded = self.loaded.lock();
        let modified = self.modified()?;

        if let Some(current) = loaded.as_ref() {
            if modified <= current.modified {
                return Ok(Arc::clone(&current.schema));
            }
            info!(path = %self.path.display(), "schema changed on disk, reloading");
        }

        let schema = Arc::new(load_schema(&self.path)?);
        *loaded = Some(Loaded {
            schema: Arc::clone(&schema),
            modified,
        });
        Ok(schema)
    }

    /// Drop the cached schema; the next call to [`schema`](Self::schema)
    /// parses the file again.
    pub fn invalidate(&self) {
        debug!(path = %self.path.display(), "schema cache invalidated");
        *self.loaded.lock() = None;
    }

    fn modified(&self) -> LoadResult<SystemTime> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::FileNotFound {
                path: self.path.display().to_string(),
            },
            _ => LoadError::Io(e),
        })?;
        Ok(metadata.modified()?)
    }
}
