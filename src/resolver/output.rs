//! Segments produced by resolution and the writers that emit them.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::asset_paths::source_url;
use crate::models::CommentStyle;
use crate::source_map::SourceMap;

/// One file's contribution to a bundle: every line of it, directive lines included.
///
/// Lines are read in full while the file is resolved, so no file handle outlives the
/// resolution of its own file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
  path: PathBuf,
  lines: Vec<String>,
}

impl Segment {
  pub(crate) fn new(path: PathBuf, lines: Vec<String>) -> Self {
    Self { path, lines }
  }

  /// Resolved path of the file.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The lines of the file in order, each ending with `\n`.
  pub fn lines(&self) -> &[String] {
    &self.lines
  }
}

/// Segments in the order they must be concatenated.
#[derive(Debug)]
pub struct ResolvedOutput {
  segments: Vec<Segment>,
  search_paths: Vec<PathBuf>,
}

impl ResolvedOutput {
  pub(crate) fn new(segments: Vec<Segment>, search_paths: Vec<PathBuf>) -> Self {
    Self {
      segments,
      search_paths,
    }
  }

  /// The segments, dependencies first.
  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  /// Paths of every included file, in emission order.
  pub fn file_list(&self) -> Vec<PathBuf> {
    self
      .segments
      .iter()
      .map(|segment| segment.path.clone())
      .collect()
  }

  /// Write every line verbatim.
  pub fn write<W: Write>(self, writer: &mut W) -> io::Result<()> {
    for segment in self.segments {
      for line in &segment.lines {
        writer.write_all(line.as_bytes())?;
      }
    }
    Ok(())
  }

  /// Concatenate everything into a string.
  pub fn into_string(self) -> String {
    self
      .segments
      .iter()
      .flat_map(|segment| segment.lines.iter().map(String::as_str))
      .collect()
  }

  /// Write every line while recording it in a source map, without a trailing comment.
  ///
  /// Sources are identified by [`source_url`] with `url_prefix`.
  pub fn write_mapped<W: Write>(self, writer: &mut W, url_prefix: &str) -> io::Result<SourceMap> {
    let mut source_map = SourceMap::new();
    for segment in self.segments {
      let url = source_url(&segment.path, &self.search_paths, url_prefix);
      source_map.set_current_file(&url);
      for line in &segment.lines {
        source_map.add_line(line);
        writer.write_all(line.as_bytes())?;
      }
    }
    Ok(source_map)
  }

  /// Write every line, then a comment pointing at `map_url`, and return the map.
  pub fn write_with_source_map<W: Write>(
    self,
    writer: &mut W,
    map_url: &str,
    style: CommentStyle,
    url_prefix: &str,
  ) -> io::Result<SourceMap> {
    let source_map = self.write_mapped(writer, url_prefix)?;
    writer.write_all(style.source_mapping_comment(map_url).as_bytes())?;
    Ok(source_map)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resolver::DirectiveResolver;
  use crate::source_fs::MemoryFs;
  use crate::source_map::vlq::decode_segment;

  fn resolved() -> ResolvedOutput {
    let fs = MemoryFs::new()
      .with_file("/lib/app.js", "//= require vendor/lib\napp();\n")
      .with_file("/lib/vendor/lib.js", "var lib = 1;\nvar more = 2;\n");
    DirectiveResolver::new(fs, ["/lib"])
      .resolve(Path::new("app.js"))
      .unwrap()
  }

  #[test]
  fn writes_lines_verbatim() {
    let mut out = Vec::new();
    resolved().write(&mut out).unwrap();
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "var lib = 1;\nvar more = 2;\n//= require vendor/lib\napp();\n"
    );
  }

  #[test]
  fn writes_source_maps_alongside_the_output() {
    let mut out = Vec::new();
    let map = resolved()
      .write_with_source_map(&mut out, "app.js.map", CommentStyle::Line, "/static/")
      .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("app();\n//# sourceMappingURL=app.js.map\n"));

    let document = map.to_document(true);
    assert_eq!(document.sources, vec!["/static/vendor/lib.js", "/static/app.js"]);
    assert_eq!(document.sources_content, vec![
      "var lib = 1;\nvar more = 2;\n",
      "//= require vendor/lib\napp();\n"
    ]);

    let segments: Vec<Vec<i64>> = document
      .mappings
      .split(';')
      .map(|segment| decode_segment(segment).unwrap())
      .collect();
    assert_eq!(segments, vec![
      vec![0, 0, 0, 0],
      vec![0, 0, 1, 0],
      vec![0, 1, -1, 0],
      vec![0, 0, 1, 0],
    ]);
  }

  #[test]
  fn block_style_trailers_for_stylesheets() {
    let fs = MemoryFs::new().with_file("/css/site.css", "body {}\n");
    let output = DirectiveResolver::new(fs, ["/css"])
      .resolve(Path::new("site.css"))
      .unwrap();
    let mut out = Vec::new();
    output
      .write_with_source_map(&mut out, "site.css.map", CommentStyle::Block, "/")
      .unwrap();
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "body {}\n/*# sourceMappingURL=site.css.map */\n"
    );
  }

  #[test]
  fn file_list_does_not_consume_segments() {
    let output = resolved();
    assert_eq!(output.file_list().len(), 2);
    assert_eq!(output.segments()[0].path(), Path::new("/lib/vendor/lib.js"));
    assert!(output.into_string().contains("app();"));
  }
}
