// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Point-in-time existence check.
    ///
    /// Unlike `Path::exists`, permission or I/O failures are reported as
    /// errors rather than folded into `false`.
    fn exists(&self, path: &Path) -> Result<bool>;

    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the directory can be opened for listing.
    ///
    /// Only opens the directory; entries are not inspected.
    fn can_list(&self, path: &Path) -> bool;

    /// List the entries of a directory, in no particular order.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists()
            .with_context(|| format!("checking existence of {:?}", path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn can_list(&self, path: &Path) -> bool {
        fs::read_dir(path).is_ok()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            let meta = entry
                .metadata()
                .with_context(|| format!("reading metadata of {:?}", entry.path()))?;
            entries.push(DirEntryInfo {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: meta.is_dir(),
                size: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_lists_and_checks_existence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.tdms"), b"abc").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let fs = RealFileSystem;
        assert!(fs.exists(&dir.path().join("a.tdms")).unwrap());
        assert!(!fs.exists(&dir.path().join("a.tdms_index")).unwrap());
        assert!(fs.is_dir(dir.path()));

        let mut entries = fs.list_dir(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.tdms");
        assert_eq!(entries[0].size, 3);
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn listing_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        assert!(fs.list_dir(&dir.path().join("missing")).is_err());
        assert!(!fs.can_list(&dir.path().join("missing")));
        assert!(fs.can_list(dir.path()));
    }
}
