//! Which files under a source directory are bundled as entry points.
//!
//! Partials (any path component starting with `_`) are never entries. On top of that a
//! selection file can narrow things down with rules of two shapes:
//!
//! - `*.css` matches every entry with that extension,
//! - anything else is a path scope: `pages` matches `pages/home.js` and `pages` itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Filter applied to entries found while scanning a directory.
pub trait EntryInclusion {
  /// Returns `true` when the entry, named by its `/`-separated path relative to the
  /// scanned directory, should be built.
  fn is_included(&self, entry: &str) -> bool;
}

/// Returns `true` when any component of `entry` starts with `_`.
pub fn is_partial(entry: &str) -> bool {
  entry
    .split(['/', '\\'])
    .any(|component| component.starts_with('_'))
}

/// One include or exclude rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EntryRule {
  /// `*.ext`: entries whose file name ends with `.ext`.
  Extension(String),
  /// A directory or file below the scanned directory.
  Scope(String),
}

impl EntryRule {
  /// Whether `entry` falls under this rule.
  pub fn matches(&self, entry: &str) -> bool {
    match self {
      Self::Extension(extension) => entry.ends_with(extension.as_str()),
      Self::Scope(scope) => entry
        .strip_prefix(scope.as_str())
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
    }
  }
}

impl TryFrom<String> for EntryRule {
  type Error = String;

  fn try_from(rule: String) -> Result<Self, Self::Error> {
    let rule = rule.trim().replace('\\', "/");
    if let Some(extension) = rule.strip_prefix('*') {
      return match extension {
        "" | "." => Err(format!("extension rule `{rule}` names no extension")),
        ext if ext.starts_with('.') && !ext.contains('/') => Ok(Self::Extension(ext.to_string())),
        _ => Err(format!("unsupported wildcard in `{rule}`; only `*.ext` is allowed")),
      };
    }

    let scope = rule.trim_matches('/');
    if scope.is_empty() {
      return Err("empty entry rule".to_string());
    }
    if scope.contains('*') {
      return Err(format!("unsupported wildcard in `{rule}`; only `*.ext` is allowed"));
    }
    Ok(Self::Scope(scope.to_string()))
  }
}

/// Include and exclude rules read from the selection file.
///
/// With no include rules every non-partial entry is included. Excludes win over includes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EntrySelection {
  include: Vec<EntryRule>,
  exclude: Vec<EntryRule>,
}

/// Failure to load a selection file.
#[derive(Debug, Error)]
pub enum EntrySelectionError {
  /// The file exists but could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Selection file.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
  /// The file is not a valid selection.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Selection file.
    path: PathBuf,
    /// Underlying JSON error, including invalid rules.
    source: serde_json::Error,
  },
}

impl EntrySelection {
  /// Build a selection from rules directly.
  pub fn new(include: Vec<EntryRule>, exclude: Vec<EntryRule>) -> Self {
    Self { include, exclude }
  }

  /// Read `path`. A missing file selects everything.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, EntrySelectionError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(source) => {
        return Err(EntrySelectionError::Io {
          path: path.to_path_buf(),
          source,
        });
      }
    };
    serde_json::from_str(&contents).map_err(|source| EntrySelectionError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Whether `entry` should be bundled.
  pub fn is_included(&self, entry: &str) -> bool {
    let entry = entry.replace('\\', "/");
    if is_partial(&entry) || self.exclude.iter().any(|rule| rule.matches(&entry)) {
      return false;
    }
    self.include.is_empty() || self.include.iter().any(|rule| rule.matches(&entry))
  }

  /// Returns `true` when there are no rules.
  pub fn is_unfiltered(&self) -> bool {
    self.include.is_empty() && self.exclude.is_empty()
  }
}

impl EntryInclusion for EntrySelection {
  fn is_included(&self, entry: &str) -> bool {
    EntrySelection::is_included(self, entry)
  }
}
