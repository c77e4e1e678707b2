//! Header detection for source files.
//!
//! The header is the leading run of lines made up solely of whitespace, `//` or `#` line
//! comments and `/* ... */` block comments. A block comment may stay open across lines. The
//! first line containing anything else ends the header for good.

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  /// Whitespace or comments only; may carry a directive.
  Header,
  /// Ordinary content. Once seen, every later line is body too.
  Body,
}

/// Line-by-line header automaton.
#[derive(Debug, Default)]
pub struct HeaderScanner {
  in_block_comment: bool,
  finished: bool,
}

impl HeaderScanner {
  /// Create a scanner positioned before the first line.
  pub fn new() -> Self {
    Self::default()
  }

  /// Classify the next line and advance the automaton.
  pub fn classify(&mut self, line: &str) -> LineKind {
    if self.finished {
      return LineKind::Body;
    }

    let mut start = 0;
    if self.in_block_comment {
      match line.find("*/") {
        Some(close) => {
          start = close + 2;
          self.in_block_comment = false;
        }
        None => return LineKind::Header,
      }
    }

    match scan_comment_tokens(&line[start..]) {
      Some(opens_block) => {
        self.in_block_comment = opens_block;
        LineKind::Header
      }
      None => {
        self.finished = true;
        LineKind::Body
      }
    }
  }

  /// Whether the last header line left a block comment open.
  pub fn in_block_comment(&self) -> bool {
    self.in_block_comment
  }

  /// Whether a body line has been seen.
  pub fn is_finished(&self) -> bool {
    self.finished
  }
}

/// Returns `None` if `text` contains anything besides whitespace and comments, otherwise
/// whether it ends inside an unterminated block comment.
fn scan_comment_tokens(text: &str) -> Option<bool> {
  let mut rest = text;
  loop {
    rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with("//") || rest.starts_with('#') {
      return Some(false);
    }
    let after_open = rest.strip_prefix("/*")?;
    match after_open.find("*/") {
      Some(close) => rest = &after_open[close + 2..],
      None => return Some(true),
    }
  }
}
