//! Lazy depth-first directory walker with observer hooks.

use std::fmt;
use std::fs::{self, DirEntry, ReadDir};
use std::io::ErrorKind;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, trace, warn};

use fsvisitor_core::{EntryKind, ItemEvent, WalkConfig, WalkError};

use crate::filter::{self, ConfigFilter, PathFilter};
use crate::observers::{EventKind, Observers};
use crate::stats::WalkStats;

/// Walks a directory tree depth-first and reports every entry to observers.
///
/// The walker itself only holds the root, the filter and the observers.
/// Each call to [`walk`](Self::walk) starts a new, independent pass over the
/// filesystem.
///
/// Within a directory, every subdirectory is reported (and its whole subtree
/// walked) before any file of that directory. Entry order within each pass
/// is whatever the OS returns.
pub struct DirectoryWalker {
    root: PathBuf,
    filter: Box<dyn PathFilter>,
    follow_links: bool,
    observers: Observers,
}

impl DirectoryWalker {
    /// Create a walker over `root` that accepts every entry.
    ///
    /// Fails if `root` is empty. The filesystem is not touched until the
    /// walk is driven.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, WalkError> {
        Self::with_filter(root, filter::accept_all())
    }

    /// Create a walker over `root` that yields only entries accepted by
    /// `filter`. Observers still see rejected entries through the raw
    /// "found" events.
    pub fn with_filter(
        root: impl Into<PathBuf>,
        filter: impl PathFilter + 'static,
    ) -> Result<Self, WalkError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(WalkError::invalid_argument("root path cannot be empty"));
        }
        Ok(Self {
            root,
            filter: Box::new(filter),
            follow_links: false,
            observers: Observers::new(),
        })
    }

    /// Create a walker from a [`WalkConfig`].
    ///
    /// A config without match rules walks with the accept-all filter.
    pub fn from_config(config: &WalkConfig) -> Result<Self, WalkError> {
        let walker = if config.has_rules() {
            Self::with_filter(config.root.clone(), ConfigFilter::from_config(config)?)?
        } else {
            Self::new(config.root.clone())?
        };
        Ok(walker.follow_links(config.follow_links))
    }

    /// Descend into symbolic links that resolve to directories.
    ///
    /// Off by default, in which case links are reported as files. There is
    /// no cycle detection.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }

    /// The root given at construction.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registered observers.
    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Registered observers, for registration through [`Observers`] directly.
    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// Subscribe to `start`.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.observers.on_start(callback);
        self
    }

    /// Subscribe to `finish`.
    pub fn on_finish(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.observers.on_finish(callback);
        self
    }

    /// Subscribe to `file-found`.
    pub fn on_file_found(&mut self, callback: impl FnMut(&mut ItemEvent) + 'static) -> &mut Self {
        self.observers.on_file_found(callback);
        self
    }

    /// Subscribe to `directory-found`.
    pub fn on_directory_found(
        &mut self,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) -> &mut Self {
        self.observers.on_directory_found(callback);
        self
    }

    /// Subscribe to `filtered-file-found`.
    pub fn on_filtered_file_found(
        &mut self,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) -> &mut Self {
        self.observers.on_filtered_file_found(callback);
        self
    }

    /// Subscribe to `filtered-directory-found`.
    pub fn on_filtered_directory_found(
        &mut self,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) -> &mut Self {
        self.observers.on_filtered_directory_found(callback);
        self
    }

    /// Subscribe to one of the four "found" kinds by value.
    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&mut ItemEvent) + 'static,
    ) -> Result<&mut Self, WalkError> {
        self.observers.on_item(kind, callback)?;
        Ok(self)
    }

    /// Start a new walk.
    ///
    /// Nothing happens until the returned iterator is first advanced; that
    /// first call fires `start`. Dropping the iterator early ends the walk
    /// without `finish`.
    pub fn walk(&mut self) -> Walk<'_> {
        Walk {
            walker: self,
            stack: Vec::new(),
            state: State::Pending,
            stats: WalkStats::new(),
            started_at: None,
        }
    }
}

impl fmt::Debug for DirectoryWalker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryWalker")
            .field("root", &self.root)
            .field("filter", &"...")
            .field("follow_links", &self.follow_links)
            .field("observers", &self.observers)
            .finish()
    }
}

impl<'w> IntoIterator for &'w mut DirectoryWalker {
    type Item = Result<PathBuf, WalkError>;
    type IntoIter = Walk<'w>;

    fn into_iter(self) -> Walk<'w> {
        self.walk()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Running,
    Done,
}

/// Which entries of a directory the current enumeration is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Dirs,
    Files,
}

impl Pass {
    fn wants(&self, kind: EntryKind) -> bool {
        match self {
            Pass::Dirs => kind.is_dir(),
            Pass::Files => kind.is_file(),
        }
    }
}

/// A directory whose content is still pending.
#[derive(Debug)]
struct Frame {
    path: PathBuf,
    depth: usize,
    pass: Pass,
    /// Opened lazily, once per pass.
    entries: Option<ReadDir>,
}

impl Frame {
    fn new(path: PathBuf, depth: usize) -> Self {
        Self {
            path,
            depth,
            pass: Pass::Dirs,
            entries: None,
        }
    }

    /// Next raw entry of the current pass. `Ok(None)` ends the pass.
    fn next_entry(&mut self) -> Result<Option<DirEntry>, WalkError> {
        if self.entries.is_none() {
            trace!(path = %self.path.display(), pass = ?self.pass, "opening directory");
            let entries = fs::read_dir(&self.path).map_err(|e| WalkError::io(&self.path, e))?;
            self.entries = Some(entries);
        }
        let Some(entries) = self.entries.as_mut() else {
            return Ok(None);
        };
        match entries.next() {
            None => Ok(None),
            Some(Ok(entry)) => Ok(Some(entry)),
            Some(Err(e)) => Err(WalkError::io(&self.path, e)),
        }
    }

    /// Switch from the directory pass to the file pass. Returns `false` once
    /// both passes are done.
    fn advance(&mut self) -> bool {
        match self.pass {
            Pass::Dirs => {
                self.pass = Pass::Files;
                self.entries = None;
                true
            }
            Pass::Files => false,
        }
    }
}

/// Outcome of dispatching the events for one entry.
enum Visit {
    /// An observer set `stop`.
    Stop,
    /// Not yielded: rejected by the filter or excluded by an observer.
    Skip(PathBuf),
    /// Hand the path to the consumer.
    Yield(PathBuf),
}

/// One pass over a [`DirectoryWalker`]'s tree.
///
/// Yields `Ok(path)` for every accepted entry. A filesystem error is
/// yielded once as `Err` and ends the walk; paths yielded before it remain
/// valid. After `None` the iterator stays exhausted.
#[derive(Debug)]
pub struct Walk<'w> {
    walker: &'w mut DirectoryWalker,
    stack: Vec<Frame>,
    state: State,
    stats: WalkStats,
    started_at: Option<Instant>,
}

impl Walk<'_> {
    /// Counters for this walk so far.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Whether the walk drained and fired `finish`.
    pub fn is_finished(&self) -> bool {
        self.stats.finished
    }

    /// Whether an observer stopped the walk.
    pub fn is_stopped(&self) -> bool {
        self.stats.stopped
    }

    /// Observers of the walker being walked.
    ///
    /// Observers registered here take part in every later dispatch of this
    /// walk and stay registered afterwards.
    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.walker.observers
    }

    fn begin(&mut self) -> Result<(), WalkError> {
        debug!(root = %self.walker.root.display(), "walk started");
        self.started_at = Some(Instant::now());
        self.state = State::Running;
        self.walker.observers.emit_start();

        let root = std::path::absolute(&self.walker.root)
            .map_err(|e| WalkError::io(&self.walker.root, e))?;
        self.stack.push(Frame::new(root, 0));
        Ok(())
    }

    fn classify(&self, entry: &DirEntry, path: &Path) -> Result<EntryKind, WalkError> {
        let file_type = entry.file_type().map_err(|e| WalkError::io(path, e))?;
        if file_type.is_dir() {
            return Ok(EntryKind::Directory);
        }
        if file_type.is_symlink() && self.walker.follow_links {
            match fs::metadata(path) {
                Ok(metadata) if metadata.is_dir() => return Ok(EntryKind::Directory),
                Ok(_) => {}
                // Dangling link.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(WalkError::io(path, e)),
            }
        }
        Ok(EntryKind::File)
    }

    fn dispatch(&mut self, kind: EventKind, event: &mut ItemEvent) {
        trace!(event = kind.name(), path = %event.path().display(), "dispatch");
        self.walker.observers.dispatch(kind, event);
    }

    /// Run the found / filtered-found stages for one entry.
    fn visit(&mut self, path: PathBuf, kind: EntryKind, depth: usize) -> Visit {
        self.stats.record_found(kind);

        let mut found = ItemEvent::new(path, kind, depth);
        self.dispatch(EventKind::found(kind), &mut found);
        if found.stop {
            return Visit::Stop;
        }
        if found.exclude {
            self.stats.excluded += 1;
            return Visit::Skip(found.into_path());
        }
        if !self.walker.filter.accepts(found.path()) {
            self.stats.rejected += 1;
            return Visit::Skip(found.into_path());
        }

        let mut filtered = ItemEvent::new(found.into_path(), kind, depth);
        self.dispatch(EventKind::filtered(kind), &mut filtered);
        if filtered.stop {
            return Visit::Stop;
        }
        if filtered.exclude {
            self.stats.excluded += 1;
            return Visit::Skip(filtered.into_path());
        }
        Visit::Yield(filtered.into_path())
    }

    fn end(&mut self) {
        self.stack.clear();
        self.state = State::Done;
        self.stats.close(self.started_at);
    }

    fn halt(&mut self) {
        self.stats.stopped = true;
        self.end();
        debug!(yielded = self.stats.yielded, "walk stopped by observer");
    }

    fn fail(&mut self, err: WalkError) -> WalkError {
        warn!(error = %err, "walk aborted");
        self.end();
        err
    }

    fn complete(&mut self) {
        self.stats.finished = true;
        self.end();
        debug!(
            dirs = self.stats.dirs_found,
            files = self.stats.files_found,
            yielded = self.stats.yielded,
            "walk finished"
        );
        self.walker.observers.emit_finish();
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<PathBuf, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Pending {
            if let Err(err) = self.begin() {
                return Some(Err(self.fail(err)));
            }
        }

        while self.state == State::Running {
            let Some(frame) = self.stack.last_mut() else {
                self.complete();
                return None;
            };

            let entry = match frame.next_entry() {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    if !frame.advance() {
                        self.stack.pop();
                    }
                    continue;
                }
                Err(err) => return Some(Err(self.fail(err))),
            };
            let pass = frame.pass;
            let depth = frame.depth + 1;

            let path = entry.path();
            let kind = match self.classify(&entry, &path) {
                Ok(kind) => kind,
                Err(err) => return Some(Err(self.fail(err))),
            };
            if !pass.wants(kind) {
                continue;
            }

            match self.visit(path, kind, depth) {
                Visit::Stop => {
                    self.halt();
                    return None;
                }
                Visit::Skip(path) => {
                    // Excluded or rejected directories are still descended into.
                    if kind.is_dir() {
                        self.stack.push(Frame::new(path, depth));
                    }
                }
                Visit::Yield(path) => {
                    if kind.is_dir() {
                        self.stack.push(Frame::new(path.clone(), depth));
                    }
                    self.stats.yielded += 1;
                    return Some(Ok(path));
                }
            }
        }

        None
    }
}

impl FusedIterator for Walk<'_> {}
