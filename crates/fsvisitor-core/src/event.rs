//! Per-entry events handed to walk observers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WalkError;

/// Type of a discovered entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A directory the walk will descend into.
    Directory,
    /// Anything else: regular files, and links that are not followed.
    File,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// One discovered filesystem entry, as seen by an observer.
///
/// A fresh event is built for every dispatch. Observers receive it by
/// mutable reference and may set the two control flags:
///
/// - [`stop`](Self::stop) ends the whole walk right after the dispatch
///   returns. Nothing else is yielded and the `finish` event never fires.
/// - [`exclude`](Self::exclude) keeps this one entry out of the output.
///   Traversal goes on, and an excluded directory is still descended into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEvent {
    path: PathBuf,
    kind: EntryKind,
    depth: usize,
    /// Halt the walk after this dispatch.
    pub stop: bool,
    /// Suppress this entry from the output.
    pub exclude: bool,
}

impl ItemEvent {
    /// Create an event with both control flags cleared.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, depth: usize) -> Self {
        Self {
            path: path.into(),
            kind,
            depth,
            stop: false,
            exclude: false,
        }
    }

    /// Create an event with explicit flag values.
    ///
    /// Fails if `path` is empty.
    pub fn with_flags(
        path: impl Into<PathBuf>,
        kind: EntryKind,
        depth: usize,
        stop: bool,
        exclude: bool,
    ) -> Result<Self, WalkError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(WalkError::invalid_argument("event path cannot be empty"));
        }
        Ok(Self {
            path,
            kind,
            depth,
            stop,
            exclude,
        })
    }

    /// Full path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the entry is a directory or a file.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Depth relative to the walk root. Direct children of the root have depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Bare name of the entry, lossily converted.
    pub fn file_name(&self) -> Option<std::borrow::Cow<'_, str>> {
        self.path.file_name().map(|n| n.to_string_lossy())
    }

    /// Consume the event and return its path.
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
