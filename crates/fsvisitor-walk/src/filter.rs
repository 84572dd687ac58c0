//! Inclusion predicates over entry paths.

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use fsvisitor_core::{WalkConfig, WalkError};

/// Decides whether a discovered entry belongs in the output.
///
/// Implemented for every `Fn(&Path) -> bool`, so plain closures work.
pub trait PathFilter {
    /// Returns `true` to keep the entry.
    fn accepts(&self, path: &Path) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn accepts(&self, path: &Path) -> bool {
        self(path)
    }
}

/// A filter that keeps everything.
pub fn accept_all() -> impl PathFilter {
    |_: &Path| true
}

/// Keep paths whose lossy string form contains `needle`.
pub fn contains(needle: impl Into<String>) -> impl PathFilter {
    let needle = needle.into();
    move |path: &Path| path.to_string_lossy().contains(needle.as_str())
}

/// Reject entries whose name starts with `.`.
pub fn hidden_excluded() -> impl PathFilter {
    |path: &Path| !is_hidden(path)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Glob patterns compiled into one matcher.
///
/// A path matches when any pattern matches either the full path or the
/// bare file name, so `*.txt` works without a leading `**/`.
#[derive(Clone)]
pub struct GlobFilter {
    set: GlobSet,
    patterns: Vec<String>,
}

impl GlobFilter {
    /// Compile `patterns`. Fails on the first invalid pattern.
    pub fn new<I, S>(patterns: I) -> Result<Self, WalkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| {
                WalkError::invalid_argument(format!("invalid glob `{pattern}`: {e}"))
            })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }
        let set = builder
            .build()
            .map_err(|e| WalkError::invalid_argument(format!("invalid glob set: {e}")))?;
        Ok(Self {
            set,
            patterns: kept,
        })
    }

    /// The source patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Check whether `path` matches any pattern.
    pub fn is_match(&self, path: &Path) -> bool {
        if self.set.is_match(path) {
            return true;
        }
        path.file_name()
            .map(|name| self.set.is_match(name))
            .unwrap_or(false)
    }
}

impl PathFilter for GlobFilter {
    fn accepts(&self, path: &Path) -> bool {
        self.is_match(path)
    }
}

impl fmt::Debug for GlobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobFilter")
            .field("patterns", &self.patterns)
            .finish()
    }
}

/// Convenience constructor for [`GlobFilter`].
pub fn glob<I, S>(patterns: I) -> Result<GlobFilter, WalkError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    GlobFilter::new(patterns)
}

/// Filter compiled from the match rules of a [`WalkConfig`].
///
/// Each configured rule kind must pass: at least one substring (if any are
/// given), at least one glob (if any are given), and the hidden-entry policy.
#[derive(Debug, Clone)]
pub struct ConfigFilter {
    needles: Vec<String>,
    globs: Option<GlobFilter>,
    include_hidden: bool,
}

impl ConfigFilter {
    /// Compile the rules of `config`.
    pub fn from_config(config: &WalkConfig) -> Result<Self, WalkError> {
        let globs = if config.globs.is_empty() {
            None
        } else {
            Some(GlobFilter::new(&config.globs)?)
        };
        Ok(Self {
            needles: config.contains.clone(),
            globs,
            include_hidden: config.include_hidden,
        })
    }
}

impl PathFilter for ConfigFilter {
    fn accepts(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }
        if !self.needles.is_empty() {
            let text = path.to_string_lossy();
            if !self.needles.iter().any(|n| text.contains(n.as_str())) {
                return false;
            }
        }
        match self.globs {
            Some(ref globs) => globs.is_match(path),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all() {
        assert!(accept_all().accepts(Path::new("/anything")));
    }

    #[test]
    fn test_contains() {
        let filter = contains("dir1");
        assert!(filter.accepts(Path::new("/root/dir1/file1.txt")));
        assert!(!filter.accepts(Path::new("/root/dir2/file3.txt")));
    }

    #[test]
    fn test_closure_is_filter() {
        let filter = |p: &Path| p.extension().is_some_and(|e| e == "txt");
        assert!(filter.accepts(Path::new("a.txt")));
        assert!(!filter.accepts(Path::new("a.rs")));
    }

    #[test]
    fn test_hidden_excluded() {
        let filter = hidden_excluded();
        assert!(!filter.accepts(Path::new("/root/.git")));
        assert!(filter.accepts(Path::new("/root/src")));
    }

    #[test]
    fn test_glob_matches_name_and_path() {
        let filter = glob(["*.txt", "**/dir2/**"]).unwrap();
        assert!(filter.accepts(Path::new("/root/dir1/file1.txt")));
        assert!(filter.accepts(Path::new("/root/dir2/notes.md")));
        assert!(!filter.accepts(Path::new("/root/dir1/notes.md")));
        assert_eq!(filter.patterns().len(), 2);
    }

    #[test]
    fn test_invalid_glob() {
        let err = glob(["a[b"]).unwrap_err();
        assert!(matches!(err, WalkError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_filter_combines_rules() {
        let config = WalkConfig::builder()
            .root("/root")
            .contains(vec!["dir1".to_string(), "dir3".to_string()])
            .globs(vec!["*.txt".to_string()])
            .include_hidden(false)
            .build()
            .unwrap();
        let filter = ConfigFilter::from_config(&config).unwrap();

        assert!(filter.accepts(Path::new("/root/dir1/file1.txt")));
        assert!(filter.accepts(Path::new("/root/dir3/file9.txt")));
        assert!(!filter.accepts(Path::new("/root/dir2/file3.txt")));
        assert!(!filter.accepts(Path::new("/root/dir1/notes.md")));
        assert!(!filter.accepts(Path::new("/root/dir1/.hidden.txt")));
    }

    #[test]
    fn test_config_filter_without_rules_accepts_all() {
        let filter = ConfigFilter::from_config(&WalkConfig::new("/root")).unwrap();
        assert!(filter.accepts(Path::new("/root/.git")));
        assert!(filter.accepts(Path::new("/root/x")));
    }
}
