// src/pairing/matcher.rs

//! Classification of a single file-creation event.

use std::path::Path;
use std::sync::Arc;

use crate::events::{EventSink, Severity};
use crate::fs::FileSystem;

use super::{FileKind, IgnoreReason, PairingRule, Recording, Verdict, WaitReason};

/// Stateless classifier invoked once per creation event.
///
/// Every call re-derives pairing from disk through the injected
/// [`FileSystem`]; the matcher itself holds no mutable state, so it can be
/// shared freely between threads.
#[derive(Debug, Clone)]
pub struct PairMatcher {
    rule: PairingRule,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn EventSink>,
}

impl PairMatcher {
    pub fn new(rule: PairingRule, fs: Arc<dyn FileSystem>, sink: Arc<dyn EventSink>) -> Self {
        Self { rule, fs, sink }
    }

    pub fn rule(&self) -> &PairingRule {
        &self.rule
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Classify a just-created path and report the verdict through the sink.
    ///
    /// Returns `None` for directories, which are ignored without logging.
    pub fn classify(&self, path: &Path, is_directory: bool) -> Option<Verdict> {
        if is_directory {
            return None;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let recognized = match (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) {
            (Some(base), Some(ext)) => self.rule.kind_of(ext).map(|kind| (base, kind)),
            _ => None,
        };

        let Some((base_name, arrived)) = recognized else {
            self.sink.emit(
                Severity::Warning,
                &format!("Unnecessary file detected: {file_name}"),
            );
            return Some(Verdict::Ignored {
                file_name,
                reason: IgnoreReason::UnrecognizedExtension,
            });
        };

        self.sink
            .emit(Severity::Info, &format!("File detected: {file_name}"));

        let missing = arrived.companion();
        let companion = path.with_file_name(format!(
            "{base_name}.{}",
            self.rule.extension(missing)
        ));
        let companion_name = companion
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let reason = match self.fs.exists(&companion) {
            Ok(true) => {
                let (data_path, index_path) = match arrived {
                    FileKind::Data => (path.to_path_buf(), companion),
                    FileKind::Index => (companion, path.to_path_buf()),
                };
                self.sink.emit(
                    Severity::Info,
                    &format!(
                        "Both data and index files detected for {base_name} ({}, {})",
                        display_name(&data_path),
                        display_name(&index_path),
                    ),
                );
                return Some(Verdict::Paired {
                    recording: Recording {
                        base_name: base_name.to_string(),
                        data_path,
                        index_path,
                    },
                    arrived,
                });
            }
            Ok(false) => {
                self.sink.emit(
                    Severity::Warning,
                    &format!("Waiting for {missing} file {companion_name} for {file_name}"),
                );
                WaitReason::CompanionAbsent
            }
            Err(err) => {
                self.sink.emit(
                    Severity::Warning,
                    &format!(
                        "Could not check for {missing} file {companion_name} for {file_name}: {err:#}"
                    ),
                );
                WaitReason::CompanionCheckFailed(format!("{err:#}"))
            }
        };

        Some(Verdict::Waiting {
            file: path.to_path_buf(),
            base_name: base_name.to_string(),
            arrived,
            missing,
            companion,
            reason,
        })
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
