// src/pairing/mod.rs

//! Data/index file pairing.
//!
//! A recording is a pair of files sharing a base name: a data file and an
//! index file. Nothing here keeps track of half-finished recordings; whether
//! a pair is complete is recomputed from disk every time one of its files is
//! created.

use std::fmt;
use std::path::PathBuf;

use crate::errors::{CncwatchError, Result};

pub mod matcher;

pub use matcher::PairMatcher;

pub const DEFAULT_DATA_EXTENSION: &str = "tdms";
pub const DEFAULT_INDEX_EXTENSION: &str = "tdms_index";

/// Which half of a recording a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Data,
    Index,
}

impl FileKind {
    pub fn companion(self) -> FileKind {
        match self {
            FileKind::Data => FileKind::Index,
            FileKind::Index => FileKind::Data,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Data => f.write_str("data"),
            FileKind::Index => f.write_str("index"),
        }
    }
}

/// The two recognized extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingRule {
    data_extension: String,
    index_extension: String,
}

impl PairingRule {
    /// Build a rule from two extensions given without the leading dot.
    pub fn new(data_extension: impl Into<String>, index_extension: impl Into<String>) -> Result<Self> {
        let data_extension = data_extension.into();
        let index_extension = index_extension.into();

        validate_extension("data_extension", &data_extension)?;
        validate_extension("index_extension", &index_extension)?;
        if data_extension == index_extension {
            return Err(CncwatchError::ConfigError(format!(
                "data_extension and index_extension must differ (both are '{}')",
                data_extension
            )));
        }

        Ok(Self {
            data_extension,
            index_extension,
        })
    }

    /// Classify an extension. Matching is case-sensitive.
    pub fn kind_of(&self, extension: &str) -> Option<FileKind> {
        if extension == self.data_extension {
            Some(FileKind::Data)
        } else if extension == self.index_extension {
            Some(FileKind::Index)
        } else {
            None
        }
    }

    pub fn extension(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Data => &self.data_extension,
            FileKind::Index => &self.index_extension,
        }
    }
}

impl Default for PairingRule {
    fn default() -> Self {
        Self {
            data_extension: DEFAULT_DATA_EXTENSION.to_string(),
            index_extension: DEFAULT_INDEX_EXTENSION.to_string(),
        }
    }
}

fn validate_extension(field: &str, ext: &str) -> Result<()> {
    if ext.is_empty() {
        return Err(CncwatchError::ConfigError(format!("{field} must not be empty")));
    }
    if ext.contains(['.', '/', '\\']) {
        return Err(CncwatchError::ConfigError(format!(
            "{field} '{ext}' must not contain '.' or path separators"
        )));
    }
    Ok(())
}

/// A complete data + index pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub base_name: String,
    pub data_path: PathBuf,
    pub index_path: PathBuf,
}

/// Why a recognized file is still waiting on its companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitReason {
    /// The companion was not on disk at the time of the check.
    CompanionAbsent,
    /// The existence check itself failed; pairing could not be confirmed.
    CompanionCheckFailed(String),
}

/// Why a created file was not considered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnrecognizedExtension,
}

/// Outcome of classifying one file-creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Both halves are on disk. `arrived` is the half whose event completed
    /// the pair.
    Paired { recording: Recording, arrived: FileKind },
    Waiting {
        file: PathBuf,
        base_name: String,
        arrived: FileKind,
        missing: FileKind,
        companion: PathBuf,
        reason: WaitReason,
    },
    Ignored { file_name: String, reason: IgnoreReason },
}

impl Verdict {
    pub fn is_paired(&self) -> bool {
        matches!(self, Verdict::Paired { .. })
    }

    pub fn recording(&self) -> Option<&Recording> {
        match self {
            Verdict::Paired { recording, .. } => Some(recording),
            _ => None,
        }
    }
}
