// src/artifact/mem.rs

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::ArtifactStore;

type Entries = Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>;

/// In-memory store for tests and embedding.
///
/// Writers buffer locally and commit to the shared map when dropped, so an
/// artifact becomes visible only once its handle has been released.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Entries,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an artifact, e.g. to simulate a previous run.
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        self.entries
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), contents.into());
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no artifact at {:?}", path),
            )),
        }
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(MemWriter {
            buf: Vec::new(),
            path: path.to_path_buf(),
            entries: Arc::clone(&self.entries),
        }))
    }
}

/// Buffering writer that commits into the store when dropped.
struct MemWriter {
    buf: Vec<u8>,
    path: PathBuf,
    entries: Entries,
}

impl Write for MemWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemWriter {
    fn drop(&mut self) {
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert(self.path.clone(), std::mem::take(&mut self.buf));
    }
}
