//! Observer registration and synchronous dispatch.
//!
//! A walk reports six kinds of events. `start` and `finish` carry no payload;
//! the four "found" kinds hand every observer the same mutable [`ItemEvent`],
//! so a flag set by one observer is seen by the ones registered after it and
//! by the walk itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use fsvisitor_core::{EntryKind, ItemEvent, WalkError};

/// Events that observers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fired once when a walk begins.
    Start,
    /// Fired once when a walk drains without being stopped.
    Finish,
    /// Fired for every file, before filtering.
    FileFound,
    /// Fired for every directory, before filtering.
    DirectoryFound,
    /// Fired for files that passed the filter and were not excluded.
    FilteredFileFound,
    /// Fired for directories that passed the filter and were not excluded.
    FilteredDirectoryFound,
}

impl EventKind {
    /// All event kinds, in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::Start,
        EventKind::Finish,
        EventKind::FileFound,
        EventKind::DirectoryFound,
        EventKind::FilteredFileFound,
        EventKind::FilteredDirectoryFound,
    ];

    /// The raw "found" event for an entry kind.
    pub fn found(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => EventKind::DirectoryFound,
            EntryKind::File => EventKind::FileFound,
        }
    }

    /// The "filtered-found" event for an entry kind.
    pub fn filtered(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => EventKind::FilteredDirectoryFound,
            EntryKind::File => EventKind::FilteredFileFound,
        }
    }

    /// Stable name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Finish => "finish",
            EventKind::FileFound => "file-found",
            EventKind::DirectoryFound => "directory-found",
            EventKind::FilteredFileFound => "filtered-file-found",
            EventKind::FilteredDirectoryFound => "filtered-directory-found",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callback for `start` and `finish`.
pub type LifecycleCallback = Box<dyn FnMut()>;

/// Callback for the four "found" events.
pub type ItemCallback = Box<dyn FnMut(&mut ItemEvent)>;

/// Ordered observer lists, one per event kind.
#[derive(Default)]
pub struct Observers {
    start: Vec<LifecycleCallback>,
    finish: Vec<LifecycleCallback>,
    file_found: Vec<ItemCallback>,
    directory_found: Vec<ItemCallback>,
    filtered_file_found: Vec<ItemCallback>,
    filtered_directory_found: Vec<ItemCallback>,
}

impl Observers {
    /// Create an empty set of observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `start` observer.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) {
        self.start.push(Box::new(callback));
    }

    /// Register a `finish` observer.
    pub fn on_finish(&mut self, callback: impl FnMut() + 'static) {
        self.finish.push(Box::new(callback));
    }

    /// Register a `file-found` observer.
    pub fn on_file_found(&mut self, callback: impl FnMut(&mut ItemEvent) + 'static) {
        self.file_found.push(Box::new(callback));
    }

    /// Register a `directory-found` observer.
    pub fn on_directory_found(&mut self, callback: impl FnMut(&mut ItemEvent) + 'static) {
        self.directory_found.push(Box::new(callback));
    }

    /// Register a `filtered-file-found` observer.
    pub fn on_filtered_file_found(&mut self, callback: impl FnMut(&mut ItemEvent) + 'static) {
        self.filtered_file_found.push(Box::new(callback));
    }

    /// Register a `filtered-directory-found` observer.
    pub fn on_filtered_directory_found(
        &mut self,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) {
        self.filtered_directory_found.push(Box::new(callback));
    }

    /// Register an observer for one of the four "found" kinds.
    ///
    /// `start` and `finish` carry no item, so passing them here is an
    /// invalid-argument error.
    pub fn on_item(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) -> Result<(), WalkError> {
        let list = self.item_list_mut(kind).ok_or_else(|| {
            WalkError::invalid_argument(format!("event `{kind}` does not carry an item"))
        })?;
        list.push(Box::new(callback));
        Ok(())
    }

    /// Number of observers registered for `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Start => self.start.len(),
            EventKind::Finish => self.finish.len(),
            EventKind::FileFound => self.file_found.len(),
            EventKind::DirectoryFound => self.directory_found.len(),
            EventKind::FilteredFileFound => self.filtered_file_found.len(),
            EventKind::FilteredDirectoryFound => self.filtered_directory_found.len(),
        }
    }

    /// Check if no observer is registered at all.
    pub fn is_empty(&self) -> bool {
        EventKind::ALL.iter().all(|kind| self.count(*kind) == 0)
    }

    /// Invoke the `start` observers in registration order.
    pub(crate) fn emit_start(&mut self) {
        for callback in self.start.iter_mut() {
            callback();
        }
    }

    /// Invoke the `finish` observers in registration order.
    pub(crate) fn emit_finish(&mut self) {
        for callback in self.finish.iter_mut() {
            callback();
        }
    }

    /// Hand `event` to every observer of `kind`, in registration order.
    ///
    /// All observers run even if an earlier one set `stop`; the walk checks
    /// the flags once the dispatch returns.
    pub(crate) fn dispatch(&mut self, kind: EventKind, event: &mut ItemEvent) {
        if let Some(list) = self.item_list_mut(kind) {
            for callback in list.iter_mut() {
                callback(event);
            }
        }
    }

    fn item_list_mut(&mut self, kind: EventKind) -> Option<&mut Vec<ItemCallback>> {
        match kind {
            EventKind::Start | EventKind::Finish => None,
            EventKind::FileFound => Some(&mut self.file_found),
            EventKind::DirectoryFound => Some(&mut self.directory_found),
            EventKind::FilteredFileFound => Some(&mut self.filtered_file_found),
            EventKind::FilteredDirectoryFound => Some(&mut self.filtered_directory_found),
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Closures aren't `Debug`, show the counts.
        let mut s = f.debug_struct("Observers");
        for kind in EventKind::ALL {
            s.field(kind.name(), &self.count(kind));
        }
        s.finish()
    }
}
