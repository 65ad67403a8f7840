//! # Rotation Index Storage
//!
//! The rotation index is the only state that outlives the process. It is
//! stored as a single decimal integer in a text file and rewritten on every
//! advance before the advance becomes visible.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a crash mid-write never leaves a truncated index behind. On
//! Unix the containing directory is synced after the rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chores_core::RotationIndex;
use parking_lot::Mutex;

use crate::error::StoreError;

/// Durable home of the rotation index.
pub trait IndexStore: Send + Sync + std::fmt::Debug {
    /// Read the persisted index.
    fn load(&self) -> Result<RotationIndex, StoreError>;

    /// Durably replace the persisted index.
    fn store(&self, index: RotationIndex) -> Result<(), StoreError>;
}

/// Index stored in a plain-text file.
#[derive(Debug, Clone)]
pub struct FileIndexStore {
    path: PathBuf,
}

impl FileIndexStore {
    /// Store the index at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the index file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn replace_with(&self, tmp: &Path, index: RotationIndex) -> Result<(), StoreError> {
        let io_err = |op: &'static str, path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { op, path, source }
        };

        let mut file = fs::File::create(tmp).map_err(io_err("create", tmp))?;
        file.write_all(index.to_string().as_bytes())
            .map_err(io_err("write", tmp))?;
        file.sync_all().map_err(io_err("sync", tmp))?;
        drop(file);

        fs::rename(tmp, &self.path).map_err(io_err("rename", &self.path))?;

        // The rename is only durable once the directory entry is flushed.
        #[cfg(unix)]
        {
            let dir = match self.path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            fs::File::open(dir)
                .and_then(|d| d.sync_all())
                .map_err(io_err("sync dir", dir))?;
        }
        Ok(())
    }
}

impl IndexStore for FileIndexStore {
    fn load(&self) -> Result<RotationIndex, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            op: "read",
            path: self.path.clone(),
            source,
        })?;
        text.parse().map_err(|source| StoreError::Invalid {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, index: RotationIndex) -> Result<(), StoreError> {
        let tmp = self.temp_path();
        if let Err(e) = self.replace_with(&tmp, index) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        tracing::debug!(path = %self.path.display(), index = %index, "rotation index persisted");
        Ok(())
    }
}

/// In-memory index store for tests and ephemeral deployments.
///
/// Counts successful writes and can be switched to reject them, which lets
/// callers exercise the storage-failure path.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    value: Mutex<RotationIndex>,
    writes: AtomicUsize,
    reject_writes: AtomicBool,
}

impl MemoryIndexStore {
    /// Start with `index` already stored.
    pub fn new(index: RotationIndex) -> Self {
        Self {
            value: Mutex::new(index),
            writes: AtomicUsize::new(0),
            reject_writes: AtomicBool::new(false),
        }
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }
}

impl IndexStore for MemoryIndexStore {
    fn load(&self) -> Result<RotationIndex, StoreError> {
        Ok(*self.value.lock())
    }

    fn store(&self, index: RotationIndex) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("writes disabled".to_string()));
        }
        *self.value.lock() = index;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
