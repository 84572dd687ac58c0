//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a directory walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root directory to walk.
    pub root: PathBuf,

    /// Descend into symbolic links that point at directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_links: bool,

    /// Substrings; a path passes if it contains any of them.
    #[builder(default)]
    #[serde(default)]
    pub contains: Vec<String>,

    /// Glob patterns; a path passes if it matches any of them.
    #[builder(default)]
    #[serde(default)]
    pub globs: Vec<String>,

    /// Include hidden entries (name starting with `.`).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a config that walks `root` and accepts everything.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            contains: Vec::new(),
            globs: Vec::new(),
            include_hidden: true,
        }
    }

    /// Whether any match rule is configured.
    pub fn has_rules(&self) -> bool {
        !self.contains.is_empty() || !self.globs.is_empty() || !self.include_hidden
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .root("/home/user")
            .follow_links(true)
            .contains(vec!["src".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.follow_links);
        assert_eq!(config.contains, vec!["src".to_string()]);
        assert!(config.include_hidden);
        assert!(config.has_rules());
    }

    #[test]
    fn test_config_builder_requires_root() {
        assert!(WalkConfig::builder().build().is_err());
        assert!(WalkConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = WalkConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(!config.follow_links);
        assert!(!config.has_rules());
    }

    #[test]
    fn test_hidden_policy_counts_as_rule() {
        let mut config = WalkConfig::new("/test");
        config.include_hidden = false;
        assert!(config.has_rules());
    }
}
