// src/artifact/mod.rs

//! Artifact storage abstraction.
//!
//! A task's completion is signalled by the existence of its output artifact,
//! so the scheduler only ever needs three operations on the storage medium:
//! an existence check and scoped read/write handles. [`ArtifactStore`]
//! abstracts the medium; [`LocalStore`] backs it with the local filesystem
//! and [`MemoryStore`] keeps everything in memory for tests and embedding.

use std::fmt::Debug;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod local;
pub mod mem;

pub use local::LocalStore;
pub use mem::MemoryStore;

/// Abstract artifact storage interface.
pub trait ArtifactStore: Send + Sync + Debug {
    /// Whether an artifact exists at `path`.
    ///
    /// Re-queries the medium on every call; no caching.
    fn exists(&self, path: &Path) -> bool;

    /// Open an artifact for reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;

    /// Open an artifact for writing, replacing any previous contents.
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;
}

/// One durable output: a path within a store.
///
/// Owned by exactly one producing task; dependents only read it, and only
/// after the producer has completed. Handles returned by the open methods
/// are released when dropped, whatever the exit path.
#[derive(Debug, Clone)]
pub struct ArtifactTarget {
    store: Arc<dyn ArtifactStore>,
    path: PathBuf,
}

impl ArtifactTarget {
    pub fn new(store: Arc<dyn ArtifactStore>, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.store.exists(&self.path)
    }

    pub fn open_read(&self) -> io::Result<Box<dyn Read + Send>> {
        self.store.open_read(&self.path)
    }

    pub fn open_write(&self) -> io::Result<Box<dyn Write + Send>> {
        self.store.open_write(&self.path)
    }

    /// Convenience for tasks that consume a whole upstream artifact.
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut contents = String::new();
        self.open_read()?.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Convenience for tasks that produce their artifact in one shot.
    pub fn write_all(&self, contents: &[u8]) -> io::Result<()> {
        let mut writer = self.open_write()?;
        writer.write_all(contents)?;
        writer.flush()
    }
}
