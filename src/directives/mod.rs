//! Header scanning and directive parsing.
//!
//! Directives only count inside the header, the leading block of comments and whitespace
//! at the top of a file. Anything that looks like a directive below the first line of real
//! code is left alone.

mod parser;
mod scanner;

pub use parser::parse_directive;
pub use scanner::{HeaderScanner, LineKind};

use crate::error::{DirectiveError, DirectiveResult};
use crate::models::Directive;

/// What a line turned out to be once fed through [`HeaderDirectives`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine {
  /// A header line, with the directive it carries if any.
  Header(Option<Directive>),
  /// The first body line; the header is over.
  Body,
}

/// Streaming combination of [`HeaderScanner`] and [`parse_directive`].
///
/// Errors come back without a location; callers know which file they are reading.
#[derive(Debug, Default)]
pub struct HeaderDirectives {
  scanner: HeaderScanner,
  lines_seen: usize,
  open_comment: Option<(usize, String)>,
}

impl HeaderDirectives {
  /// Start at the top of a file.
  pub fn new() -> Self {
    Self::default()
  }

  /// Feed the next line.
  pub fn feed(&mut self, line: &str) -> DirectiveResult<HeaderLine> {
    self.lines_seen += 1;
    let was_open = self.scanner.in_block_comment();
    if self.scanner.classify(line) == LineKind::Body {
      return Ok(HeaderLine::Body);
    }
    if self.scanner.in_block_comment() && (!was_open || line.contains("*/")) {
      self.open_comment = Some((self.lines_seen, line.trim_end().to_string()));
    }
    parse_directive(line).map(HeaderLine::Header)
  }

  /// Check the header did not end inside an unclosed block comment.
  ///
  /// On failure returns the error together with the line that opened the comment.
  pub fn finish(self) -> Result<(), (usize, DirectiveError)> {
    if !self.scanner.in_block_comment() {
      return Ok(());
    }
    let (line, text) = self.open_comment.unwrap_or((1, String::new()));
    Err((
      line,
      DirectiveError::malformed(text, "Unterminated block comment"),
    ))
  }
}
