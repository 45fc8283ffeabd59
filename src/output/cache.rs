use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// The file holding the last non-blank transform result.
///
/// Alfred reads it back on the next run, so a transform that produces
/// nothing still shows the previous result.
#[derive(Debug, Clone)]
pub struct OutputCache {
    path: PathBuf,
}

impl OutputCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    pub fn write(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content).map_err(|e| Error::io(&self.path, e))
    }

    /// Write `content` only when no cache exists yet.
    pub fn seed(&self, content: &str) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        tracing::debug!("Seeding output cache {}", self.path.display());
        self.write(content)?;
        Ok(true)
    }
}
