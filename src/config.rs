//! Bundle configuration loaded from the project directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for by [`BundleConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "directives.config.json";

/// Discoverable configuration describing where sources live and how bundles are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Directories searched, in order, for names that are neither absolute nor relative.
    pub search_paths: Vec<String>,
    /// Prefix of the source identifiers recorded in source maps.
    pub url_prefix: String,
    /// Whether to write a source map next to each bundle.
    pub source_maps: bool,
    /// Whether source maps embed the original text of every source.
    pub inline_sources: bool,
    /// Directory bundles are written to.
    pub out_dir: String,
    /// Extensions of files treated as bundle entries when scanning directories.
    pub extensions: Vec<String>,
    /// JSON file with include/exclude rules for entry discovery.
    pub selection_file: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            url_prefix: "/".into(),
            source_maps: false,
            inline_sources: true,
            out_dir: "dist".into(),
            extensions: vec![".js".into(), ".css".into()],
            selection_file: "entries.local.json".into(),
        }
    }
}

impl BundleConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to default
    /// values so callers can keep going with sensible assumptions.
    pub fn discover(project_dir: &Path) -> Self {
        let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Search paths resolved against `project_dir`.
    pub fn search_path_dirs(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .map(|path| project_dir.join(path))
            .collect()
    }

    /// Output directory resolved against `project_dir`.
    pub fn out_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.out_dir)
    }

    /// Selection file resolved against `project_dir`.
    pub fn selection_file_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.selection_file)
    }
}
