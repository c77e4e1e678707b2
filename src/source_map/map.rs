//! Line-granular source map builder.

use std::io::{self, Write};

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::vlq;

/// Serialized form of a version 3 source map.
///
/// Field order matches the order keys are written in, which some consumers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapDocument {
  /// Always `3`.
  pub version: u8,
  /// Source identifiers, in first-seen order.
  pub sources: Vec<String>,
  /// Original text of each source, or empty when sources are not inlined.
  pub sources_content: Vec<String>,
  /// Symbol names; never populated.
  pub names: Vec<String>,
  /// One encoded segment per generated line, separated by `;`.
  pub mappings: String,
}

/// Records where every generated line came from while a bundle is written.
///
/// Call [`SourceMap::set_current_file`] before the lines of each source, then
/// [`SourceMap::add_line`] once per line as it is written.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
  sources: Vec<String>,
  sources_content: Vec<String>,
  mappings: Vec<String>,
  last_source: usize,
  last_line: usize,
  current_source: usize,
  current_line: usize,
}

impl SourceMap {
  /// Create an empty map.
  pub fn new() -> Self {
    Self::default()
  }

  /// Start attributing lines to `source`, from its first line.
  pub fn set_current_file(&mut self, source: &str) {
    let index = match self.sources.iter().position(|known| known == source) {
      Some(index) => index,
      None => {
        self.sources.push(source.to_string());
        self.sources_content.push(String::new());
        self.sources.len() - 1
      }
    };
    self.current_source = index;
    self.current_line = 0;
  }

  /// Record one generated line, taken from the current line of the current source.
  pub fn add_line(&mut self, line: &str) {
    if let Some(content) = self.sources_content.get_mut(self.current_source) {
      content.push_str(line);
    }

    let segment = [
      0,
      delta(self.current_source, self.last_source),
      delta(self.current_line, self.last_line),
      0,
    ];
    self.mappings.push(vlq::encode_segment(&segment));

    self.last_source = self.current_source;
    self.last_line = self.current_line;
    self.current_line += 1;
  }

  /// Source identifiers seen so far.
  pub fn sources(&self) -> &[String] {
    &self.sources
  }

  /// Accumulated text of each source, parallel to [`SourceMap::sources`].
  pub fn sources_content(&self) -> &[String] {
    &self.sources_content
  }

  /// Number of generated lines recorded.
  pub fn line_count(&self) -> usize {
    self.mappings.len()
  }

  /// Snapshot the map as a serializable document.
  pub fn to_document(&self, inline_sources: bool) -> SourceMapDocument {
    SourceMapDocument {
      version: 3,
      sources: self.sources.clone(),
      sources_content: if inline_sources {
        self.sources_content.clone()
      } else {
        Vec::new()
      },
      names: Vec::new(),
      mappings: self.mappings.join(";"),
    }
  }

  /// Serialize to a JSON string.
  pub fn dumps(&self, inline_sources: bool) -> String {
    serde_json::to_string(&self.to_document(inline_sources))
      .expect("source map documents always serialize")
  }

  /// Serialize as JSON into `writer`.
  pub fn dump<W: Write>(&self, writer: W, inline_sources: bool) -> io::Result<()> {
    serde_json::to_writer(writer, &self.to_document(inline_sources)).map_err(io::Error::from)
  }

  /// Encode the map as a `data:` URL suitable for an inline `sourceMappingURL`.
  pub fn to_data_url(&self, inline_sources: bool) -> String {
    format!(
      "data:application/json;charset=utf-8;base64,{}",
      general_purpose::STANDARD.encode(self.dumps(inline_sources))
    )
  }
}

fn delta(current: usize, last: usize) -> i64 {
  current as i64 - last as i64
}
