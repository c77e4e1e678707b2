//! Parsing of `//= command argument` style directives.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{DirectiveError, DirectiveResult};
use crate::models::Directive;

fn directive_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"^\s*(?:\*|//|#)\s*=\s*(\w+[./'"\s\w-]*?)\n?$"#)
      .expect("invalid directive regex")
  })
}

/// Parse a header line into a directive.
///
/// Lines that do not look like a directive yield `Ok(None)` and stay ordinary comment text.
/// A line that does look like one must split, shell style, into exactly a command and an
/// argument, so `//= require "path with spaces"` is a single argument.
pub fn parse_directive(line: &str) -> DirectiveResult<Option<Directive>> {
  let Some(captures) = directive_pattern().captures(line) else {
    return Ok(None);
  };
  // Trailing whitespace includes a CRLF `\r`, which shell splitting keeps as a character.
  let text = captures.get(1).map_or("", |m| m.as_str()).trim_end();

  let words = shlex::split(text)
    .ok_or_else(|| DirectiveError::malformed(text, "No closing quotation"))?;

  match <[String; 2]>::try_from(words) {
    Ok([command, argument]) => Ok(Some(Directive { command, argument })),
    Err(words) => Err(DirectiveError::malformed(
      text,
      format!("Expected 2 arguments but got {}", words.len()),
    )),
  }
}
