use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Temporary directory that fakes a CNC machine dropping telemetry files.
pub struct TelemetryDir {
    dir: TempDir,
}

impl TelemetryDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create `name` with some placeholder bytes and return its full path.
    pub fn drop_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, b"TDSm")?;
        Ok(path)
    }

    pub fn make_subdir(&self, name: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::create_dir(&path)?;
        Ok(path)
    }
}
