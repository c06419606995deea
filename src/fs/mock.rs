// src/fs/mock.rs

use super::{DirEntryInfo, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(u64),
    Dir,
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failing: HashSet<PathBuf>,
}

/// In-memory filesystem for classifier and session tests.
///
/// Parent directories are created implicitly. Existence checks can be made
/// to fail for specific paths, and every existence check is counted.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
    exists_calls: Arc<AtomicUsize>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>, size: u64) {
        let path = path.as_ref();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            ensure_dirs(&mut state, parent);
        }
        state.entries.insert(path.to_path_buf(), MockEntry::File(size));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dirs(&mut state, path.as_ref());
    }

    /// Make every subsequent `exists` call for `path` fail. A failing
    /// directory can also no longer be listed.
    pub fn fail_exists_for(&self, path: impl AsRef<Path>) {
        self.lock().failing.insert(path.as_ref().to_path_buf());
    }

    /// How many times `exists` has been called.
    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }
}

fn ensure_dirs(state: &mut MockState, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        state
            .entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.failing.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        Ok(state.entries.contains_key(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().entries.get(path), Some(MockEntry::Dir))
    }

    fn can_list(&self, path: &Path) -> bool {
        let state = self.lock();
        matches!(state.entries.get(path), Some(MockEntry::Dir)) && !state.failing.contains(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir) => {}
            _ => return Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
        if state.failing.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }

        let entries = state
            .entries
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, entry)| DirEntryInfo {
                path: p.clone(),
                name: p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                is_dir: matches!(entry, MockEntry::Dir),
                size: match entry {
                    MockEntry::File(size) => *size,
                    MockEntry::Dir => 0,
                },
                modified: SystemTime::UNIX_EPOCH,
            })
            .collect();
        Ok(entries)
    }
}
