//! File-backed high-score store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::HighScoreStore;

/// Keeps the encoded high score in a single file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, blob: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.path, blob)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                eprintln!(
                    "[Host] Cannot read high score from {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&mut self, blob: &[u8]) {
        if let Err(e) = self.write(blob) {
            eprintln!("[Host] High score not saved: {:#}", e);
        }
    }
}
