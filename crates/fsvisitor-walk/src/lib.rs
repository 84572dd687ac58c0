//! Lazy, observable directory walking for fsvisitor.
//!
//! This crate provides [`DirectoryWalker`], a depth-first walker that yields
//! paths on demand and reports every entry to registered observers.
//!
//! # Overview
//!
//! - **Lazy**: nothing is read until the [`Walk`] iterator is advanced
//! - **Observable**: six event kinds (`start`, `finish`, and raw/filtered
//!   "found" events for files and directories)
//! - **Controllable**: observers can exclude single entries or stop the
//!   whole walk
//! - **Filterable**: closures, substring and glob filters, or a
//!   [`WalkConfig`]
//!
//! # Example
//!
//! ```rust,no_run
//! use fsvisitor_walk::{filter, DirectoryWalker};
//!
//! let mut walker = DirectoryWalker::with_filter("/path/to/walk", filter::contains(".rs"))?;
//! walker.on_directory_found(|event| {
//!     if event.file_name().as_deref() == Some("target") {
//!         event.exclude = true;
//!     }
//! });
//!
//! for path in walker.walk() {
//!     println!("{}", path?.display());
//! }
//! # Ok::<(), fsvisitor_walk::WalkError>(())
//! ```
//!
//! # Stopping early
//!
//! Setting [`ItemEvent::stop`] ends the walk at every depth, and `finish`
//! is never fired:
//!
//! ```rust,no_run
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use fsvisitor_walk::DirectoryWalker;
//!
//! let finished = Rc::new(Cell::new(false));
//! let mut walker = DirectoryWalker::new("/path/to/walk")?;
//! walker.on_file_found(|event| event.stop = true);
//! let flag = Rc::clone(&finished);
//! walker.on_finish(move || flag.set(true));
//!
//! let dirs_only: Vec<_> = walker.walk().collect::<Result<_, _>>()?;
//! assert!(!finished.get());
//! # let _ = dirs_only;
//! # Ok::<(), fsvisitor_walk::WalkError>(())
//! ```

pub mod filter;
mod observers;
mod stats;
mod walker;

pub use filter::{ConfigFilter, GlobFilter, PathFilter};
pub use observers::{EventKind, ItemCallback, LifecycleCallback, Observers};
pub use stats::WalkStats;
pub use walker::{DirectoryWalker, Walk};

// Re-export core types for convenience
pub use fsvisitor_core::{EntryKind, ItemEvent, WalkConfig, WalkConfigBuilder, WalkError};
