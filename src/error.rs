//! Errors raised while resolving directives.
//!
//! Every failure during resolution is fatal. An error is tagged with the file and line of the
//! directive that triggered it by the innermost frame that sees it; outer frames leave that
//! location untouched as the error unwinds.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used by the resolution pipeline.
pub type DirectiveResult<T> = Result<T, DirectiveError>;

/// The specific failure behind a [`DirectiveError`].
#[derive(Debug, Error)]
pub enum DirectiveErrorKind {
  /// No candidate path for a required name existed.
  #[error("Unable to find \"{name}\", looked in:{}", format_candidates(.candidates))]
  FileNotFound {
    /// Name as written in the directive.
    name: String,
    /// Every path that was tried, in the order it was tried.
    candidates: Vec<PathBuf>,
  },

  /// A header directive used a command other than `require` or `stub`.
  #[error("Unknown directive: {command}")]
  UnknownDirective {
    /// Offending command word.
    command: String,
  },

  /// Directive text could not be split into exactly two words.
  #[error("{reason} in: {text}")]
  MalformedDirective {
    /// Raw directive text following the `=` marker.
    text: String,
    /// Short description of what was wrong.
    reason: String,
  },

  /// A source file could not be opened or read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// File being read.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
}

fn format_candidates(candidates: &[PathBuf]) -> String {
  candidates
    .iter()
    .map(|candidate| format!("\n  {}", candidate.display()))
    .collect()
}

/// File and 1-based line number of the directive an error originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
  /// Absolute path of the file holding the directive.
  pub path: PathBuf,
  /// 1-based line number of the directive.
  pub line: usize,
}

/// Fatal resolution error, optionally located at a directive.
#[derive(Debug)]
pub struct DirectiveError {
  kind: DirectiveErrorKind,
  location: Option<SourceLocation>,
}

impl DirectiveError {
  /// Create an error with no location attached yet.
  pub fn new(kind: DirectiveErrorKind) -> Self {
    Self {
      kind,
      location: None,
    }
  }

  /// Shorthand for a [`DirectiveErrorKind::MalformedDirective`] error.
  pub fn malformed(text: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::new(DirectiveErrorKind::MalformedDirective {
      text: text.into(),
      reason: reason.into(),
    })
  }

  /// Shorthand for a [`DirectiveErrorKind::Io`] error.
  pub fn io(path: &Path, source: std::io::Error) -> Self {
    Self::new(DirectiveErrorKind::Io {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Attach a location unless one was already recorded further down the stack.
  pub fn annotate(mut self, path: &Path, line: usize) -> Self {
    if self.location.is_none() {
      self.location = Some(SourceLocation {
        path: path.to_path_buf(),
        line,
      });
    }
    self
  }

  /// The failure category and its details.
  pub fn kind(&self) -> &DirectiveErrorKind {
    &self.kind
  }

  /// Where the failing directive lives, when known.
  pub fn location(&self) -> Option<&SourceLocation> {
    self.location.as_ref()
  }
}

impl From<DirectiveErrorKind> for DirectiveError {
  fn from(kind: DirectiveErrorKind) -> Self {
    Self::new(kind)
  }
}

impl fmt::Display for DirectiveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.location {
      Some(location) => write!(
        f,
        "in \"{}\" at line {}: {}",
        location.path.display(),
        location.line,
        self.kind
      ),
      None => write!(f, "{}", self.kind),
    }
  }
}

impl std::error::Error for DirectiveError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match &self.kind {
      DirectiveErrorKind::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}
