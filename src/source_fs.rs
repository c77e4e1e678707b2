//! The two environment capabilities resolution needs: checking that a path exists and
//! reading a file line by line.
//!
//! Line readers own their file handle. Dropping a reader closes the file, whether or not
//! every line was consumed, so a resolution that abandons a stream part way never leaks it.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Lazily read lines, each ending with `\n`.
pub type LineReader = Box<dyn Iterator<Item = io::Result<String>>>;

/// Access to source files during resolution.
pub trait SourceFs {
  /// Returns `true` when `path` names an existing file.
  fn exists(&self, path: &Path) -> bool;

  /// Open `path` for line-by-line reading.
  fn read_lines(&self, path: &Path) -> io::Result<LineReader>;
}

impl<T: SourceFs + ?Sized> SourceFs for &T {
  fn exists(&self, path: &Path) -> bool {
    (**self).exists(path)
  }

  fn read_lines(&self, path: &Path) -> io::Result<LineReader> {
    (**self).read_lines(path)
  }
}

/// Reads sources from the local file system as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl SourceFs for NativeFs {
  fn exists(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn read_lines(&self, path: &Path) -> io::Result<LineReader> {
    let file = File::open(path)?;
    Ok(Box::new(TerminatedLines::new(BufReader::new(file))))
  }
}

/// In-memory source tree, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
  files: BTreeMap<PathBuf, String>,
}

impl MemoryFs {
  /// Create an empty tree.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add or replace a file.
  pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
    self.files.insert(path.into(), contents.into());
  }

  /// Builder-style variant of [`MemoryFs::insert`].
  pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
    self.insert(path, contents);
    self
  }
}

impl SourceFs for MemoryFs {
  fn exists(&self, path: &Path) -> bool {
    self.files.contains_key(path)
  }

  fn read_lines(&self, path: &Path) -> io::Result<LineReader> {
    let contents = self.files.get(path).ok_or_else(|| {
      io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} is not in the in-memory tree", path.display()),
      )
    })?;
    Ok(Box::new(TerminatedLines::new(Cursor::new(
      contents.clone().into_bytes(),
    ))))
  }
}

/// Line iterator that keeps line endings and adds a `\n` to a final unterminated line.
pub struct TerminatedLines<R> {
  reader: R,
}

impl<R: BufRead> TerminatedLines<R> {
  /// Wrap a buffered reader.
  pub fn new(reader: R) -> Self {
    Self { reader }
  }
}

impl<R: BufRead> Iterator for TerminatedLines<R> {
  type Item = io::Result<String>;

  fn next(&mut self) -> Option<Self::Item> {
    let mut line = String::new();
    match self.reader.read_line(&mut line) {
      Ok(0) => None,
      Ok(_) => {
        if !line.ends_with('\n') {
          line.push('\n');
        }
        Some(Ok(line))
      }
      Err(err) => Some(Err(err)),
    }
  }
}
