// src/artifact/local.rs

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use super::ArtifactStore;

/// Store backed by `std::fs`.
///
/// Relative artifact paths are resolved against a root directory, typically
/// the directory containing the pipeline config, so a pipeline can be run
/// from anywhere.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ArtifactStore for LocalStore {
    fn exists(&self, path: &Path) -> bool {
        self.full_path(path).is_file()
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = fs::File::open(self.full_path(path))?;
        Ok(Box::new(file))
    }

    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let full = self.full_path(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(full)?;
        Ok(Box::new(file))
    }
}
