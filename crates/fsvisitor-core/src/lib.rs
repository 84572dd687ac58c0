//! Core types for fsvisitor.
//!
//! This crate provides the data structures shared by the walker and its
//! callers: the per-entry [`ItemEvent`] handed to observers, the
//! [`WalkError`] type, and the [`WalkConfig`] used to set up a walk.

mod config;
mod error;
mod event;

pub use config::{WalkConfig, WalkConfigBuilder, WalkConfigBuilderError};
pub use error::WalkError;
pub use event::{EntryKind, ItemEvent};
