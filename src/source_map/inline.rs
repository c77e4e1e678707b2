//! Splicing `sourcesContent` into source maps produced by other tools.
//!
//! External post-processors often regenerate a map without inlined sources. These helpers
//! put the sources back while leaving every other key where it was.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use super::SourceMap;

/// Failure while rewriting a source map file.
#[derive(Debug, Error)]
pub enum SourceMapFileError {
  /// The file could not be read or written.
  #[error("failed to access {}: {source}", path.display())]
  Io {
    /// File being accessed.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
  /// The file is not a JSON object.
  #[error("failed to parse source map {}: {source}", path.display())]
  Parse {
    /// File being parsed.
    path: PathBuf,
    /// Underlying JSON error.
    source: serde_json::Error,
  },
}

/// Return `original` with `sources_content` placed directly after `sources`.
///
/// Any existing `sourcesContent` is dropped from its old position. Maps without a `sources`
/// key come back without `sourcesContent`.
pub fn splice_sources_content(
  original: Map<String, Value>,
  sources_content: Vec<Value>,
) -> Map<String, Value> {
  let mut pending = Some(Value::Array(sources_content));
  let mut spliced = Map::new();

  for (key, value) in original {
    if key == "sourcesContent" {
      continue;
    }
    let is_sources = key == "sources";
    spliced.insert(key, value);
    if is_sources {
      if let Some(content) = pending.take() {
        spliced.insert("sourcesContent".to_string(), content);
      }
    }
  }

  spliced
}

impl SourceMap {
  /// Rewrite the map at `path` so its `sourcesContent` holds the text accumulated here.
  pub fn add_inline_sources(&self, path: &Path) -> Result<(), SourceMapFileError> {
    let content = self
      .sources_content()
      .iter()
      .cloned()
      .map(Value::String)
      .collect();
    rewrite_map(path, |_| content)
  }
}

/// Fill `target`'s `sourcesContent` from `original`, matching entries by source name.
///
/// Sources of `target` that `original` does not know get `null`.
pub fn copy_sources_inline(target: &Path, original: &Path) -> Result<(), SourceMapFileError> {
  let original_map = read_map(original)?;
  let names = string_array(original_map.get("sources"));
  let contents = original_map
    .get("sourcesContent")
    .and_then(Value::as_array)
    .cloned()
    .unwrap_or_default();

  let by_name: HashMap<String, Value> = names.into_iter().zip(contents).collect();

  rewrite_map(target, |target_map| {
    string_array(target_map.get("sources"))
      .iter()
      .map(|name| by_name.get(name).cloned().unwrap_or(Value::Null))
      .collect()
  })
}

/// Set `target`'s `sourcesContent` to the full text of `source_file`.
pub fn copy_single_source_inline(
  target: &Path,
  source_file: &Path,
) -> Result<(), SourceMapFileError> {
  let text = fs::read_to_string(source_file).map_err(|source| SourceMapFileError::Io {
    path: source_file.to_path_buf(),
    source,
  })?;
  rewrite_map(target, |_| vec![Value::String(text)])
}

fn rewrite_map<F>(path: &Path, sources_content: F) -> Result<(), SourceMapFileError>
where
  F: FnOnce(&Map<String, Value>) -> Vec<Value>,
{
  let original = read_map(path)?;
  let content = sources_content(&original);
  let spliced = splice_sources_content(original, content);
  let json = serde_json::to_string(&spliced).map_err(|source| SourceMapFileError::Parse {
    path: path.to_path_buf(),
    source,
  })?;
  fs::write(path, json).map_err(|source| SourceMapFileError::Io {
    path: path.to_path_buf(),
    source,
  })
}

fn read_map(path: &Path) -> Result<Map<String, Value>, SourceMapFileError> {
  let text = fs::read_to_string(path).map_err(|source| SourceMapFileError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&text).map_err(|source| SourceMapFileError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

fn string_array(value: Option<&Value>) -> Vec<String> {
  value
    .and_then(Value::as_array)
    .map(|items| {
      items
        .iter()
        .map(|item| item.as_str().unwrap_or_default().to_string())
        .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn splices_after_sources_and_keeps_other_keys_in_order() {
    let original: Map<String, Value> = serde_json::from_str(
      r#"{"version":3,"file":"app.min.js","sources":["a.js"],"sourcesContent":[null],"names":["x"],"mappings":"AAAA"}"#,
    )
    .unwrap();

    let spliced = splice_sources_content(original, vec![Value::String("a\n".into())]);
    assert_eq!(
      serde_json::to_string(&spliced).unwrap(),
      r#"{"version":3,"file":"app.min.js","sources":["a.js"],"sourcesContent":["a\n"],"names":["x"],"mappings":"AAAA"}"#
    );
  }

  #[test]
  fn maps_without_sources_gain_no_content() {
    let original: Map<String, Value> =
      serde_json::from_str(r#"{"version":3,"sourcesContent":["x"],"mappings":""}"#).unwrap();
    let spliced = splice_sources_content(original, vec![Value::Null]);
    assert_eq!(
      serde_json::to_string(&spliced).unwrap(),
      r#"{"version":3,"mappings":""}"#
    );
  }

  #[test]
  fn adds_accumulated_sources_to_an_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.min.js.map");
    fs::write(
      &path,
      r#"{"version":3,"sources":["/lib.js"],"names":[],"mappings":"AAAA","file":"app.min.js"}"#,
    )
    .unwrap();

    let mut map = SourceMap::new();
    map.set_current_file("/lib.js");
    map.add_line("var lib;\n");
    map.add_inline_sources(&path).unwrap();

    assert_eq!(
      fs::read_to_string(&path).unwrap(),
      r#"{"version":3,"sources":["/lib.js"],"sourcesContent":["var lib;\n"],"names":[],"mappings":"AAAA","file":"app.min.js"}"#
    );
  }

  #[test]
  fn copies_sources_by_name_from_another_map() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("app.js.map");
    let target = dir.path().join("app.min.js.map");
    fs::write(
      &original,
      r#"{"version":3,"sources":["/a.js","/b.js"],"sourcesContent":["A\n","B\n"],"names":[],"mappings":""}"#,
    )
    .unwrap();
    fs::write(
      &target,
      r#"{"version":3,"sources":["/b.js","/c.js"],"names":[],"mappings":"AAAA"}"#,
    )
    .unwrap();

    copy_sources_inline(&target, &original).unwrap();

    assert_eq!(
      fs::read_to_string(&target).unwrap(),
      r#"{"version":3,"sources":["/b.js","/c.js"],"sourcesContent":["B\n",null],"names":[],"mappings":"AAAA"}"#
    );
  }

  #[test]
  fn copies_a_single_source_file() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("site.css");
    let target = dir.path().join("site.min.css.map");
    fs::write(&source, "body { margin: 0 }\n").unwrap();
    fs::write(&target, r#"{"version":3,"sources":["site.css"],"mappings":"AAAA"}"#).unwrap();

    copy_single_source_inline(&target, &source).unwrap();

    let rewritten: Map<String, Value> =
      serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    let keys: Vec<&str> = rewritten.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["version", "sources", "sourcesContent", "mappings"]);
    assert_eq!(rewritten["sourcesContent"][0], "body { margin: 0 }\n");
  }

  #[test]
  fn reports_unparseable_maps() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.map");
    fs::write(&path, "not json").unwrap();
    let err = SourceMap::new().add_inline_sources(&path).unwrap_err();
    assert!(matches!(err, SourceMapFileError::Parse { .. }));
  }
}
