//! Data structures shared across the resolution and bundling stages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A `command argument` pair parsed from one header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
  /// Command word, normally `require` or `stub`.
  pub command: String,
  /// Name of the file the command refers to.
  pub argument: String,
}

impl Directive {
  /// Build a directive from its two words.
  pub fn new(command: impl Into<String>, argument: impl Into<String>) -> Self {
    Self {
      command: command.into(),
      argument: argument.into(),
    }
  }
}

/// Comment syntax used for the trailing `sourceMappingURL` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
  /// `//# sourceMappingURL=...`, for scripts.
  #[default]
  Line,
  /// `/*# sourceMappingURL=... */`, for stylesheets.
  Block,
}

impl CommentStyle {
  /// Pick the style matching the language of `path`.
  pub fn for_path(path: &Path) -> Self {
    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("css") => Self::Block,
      _ => Self::Line,
    }
  }

  /// Render the trailing comment pointing at `url`, newline included.
  pub fn source_mapping_comment(self, url: &str) -> String {
    match self {
      Self::Line => format!("//# sourceMappingURL={url}\n"),
      Self::Block => format!("/*# sourceMappingURL={url} */\n"),
    }
  }
}

/// Serializable record of one bundle written by [`crate::BundleBuilder`].
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSummary {
  /// Entry file the bundle was resolved from.
  pub entry: PathBuf,
  /// Path of the concatenated output.
  pub output: PathBuf,
  /// Path of the sidecar source map, when one was written.
  pub source_map: Option<PathBuf>,
  /// Every file included in the bundle, in emission order.
  pub files: Vec<PathBuf>,
}
