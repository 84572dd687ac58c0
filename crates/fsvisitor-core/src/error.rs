//! Error types for walk setup and traversal.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while building or driving a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// A constructor argument was missing or malformed.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found, or removed while the walk was running.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// A path that had to be a directory is not one.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WalkError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns the path associated with this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::Io { path, .. } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_error_io_classifies_kind() {
        let err = WalkError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, WalkError::PermissionDenied { .. }));

        let err = WalkError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, WalkError::NotFound { .. }));

        let err = WalkError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, WalkError::Io { .. }));
    }

    #[test]
    fn test_walk_error_path() {
        let err = WalkError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.path(), Some(Path::new("/test/path")));
        assert!(WalkError::invalid_argument("root").path().is_none());
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = WalkError::invalid_argument("root path is empty");
        assert_eq!(err.to_string(), "Invalid argument: root path is empty");
    }
}
