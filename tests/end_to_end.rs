use std::fs;
use std::path::{Path, PathBuf};

use directive_bundler::builder::{BundleBuilder, BundleOptions, SourceMapMode};
use directive_bundler::source_map::{SourceMapDocument, copy_sources_inline};
use directive_bundler::{CommentStyle, DirectiveErrorKind, DirectiveResolver, NativeFs};
use tempfile::{TempDir, tempdir};

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
  let path = root.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(&path, contents).unwrap();
  path
}

/// Two search paths where `somelib` stubs a file `localfile` later requires.
fn fixture() -> (TempDir, PathBuf, PathBuf) {
  let dir = tempdir().unwrap();
  let lib1 = dir.path().join("lib1");
  let lib2 = dir.path().join("lib2");
  write(
    &lib1,
    "test.js",
    "//= require somelib\n//= require ./localfile\nhello\n",
  );
  write(
    &lib1,
    "localfile.js",
    "//= require ./sub/morelocal.js\n//= require otherlib.js\nsome content\n",
  );
  write(&lib1, "sub/morelocal.js", "more local\n");
  write(&lib2, "somelib.js", "//= stub otherlib\nnothing much here\n");
  write(&lib2, "otherlib.js", "should not be included\n");
  (dir, lib1, lib2)
}

#[test]
fn resolves_search_paths_relative_names_and_stubs() {
  let (_dir, lib1, lib2) = fixture();
  let resolver = DirectiveResolver::new(NativeFs, [lib1.clone(), lib2.clone()]);
  let output = resolver.resolve(Path::new("test.js")).unwrap();

  assert_eq!(output.file_list(), vec![
    lib2.join("somelib.js"),
    lib1.join("sub/morelocal.js"),
    lib1.join("localfile.js"),
    lib1.join("test.js"),
  ]);
  assert_eq!(
    output.into_string(),
    "//= stub otherlib\nnothing much here\n\
     more local\n\
     //= require ./sub/morelocal.js\n//= require otherlib.js\nsome content\n\
     //= require somelib\n//= require ./localfile\nhello\n"
  );
}

#[test]
fn repeated_resolution_is_byte_identical() {
  let (_dir, lib1, lib2) = fixture();
  let resolver = DirectiveResolver::new(NativeFs, [lib1, lib2]);

  let render = || {
    let mut out = Vec::new();
    let map = resolver
      .resolve(Path::new("test.js"))
      .unwrap()
      .write_with_source_map(&mut out, "test.js.map", CommentStyle::Line, "/")
      .unwrap();
    (out, map.dumps(true))
  };

  assert_eq!(render(), render());
}

#[test]
fn source_maps_point_back_at_every_original_line() {
  let (_dir, lib1, lib2) = fixture();
  let resolver = DirectiveResolver::new(NativeFs, [lib1, lib2]);
  let mut out = Vec::new();
  let map = resolver
    .resolve(Path::new("test.js"))
    .unwrap()
    .write_with_source_map(&mut out, "test.js.map", CommentStyle::Line, "/static/")
    .unwrap();

  let document: SourceMapDocument = serde_json::from_str(&map.dumps(true)).unwrap();
  assert_eq!(document.version, 3);
  assert_eq!(document.sources, vec![
    "/static/somelib.js",
    "/static/sub/morelocal.js",
    "/static/localfile.js",
    "/static/test.js",
  ]);
  assert_eq!(document.sources_content[1], "more local\n");
  assert_eq!(document.mappings.split(';').count(), 9);

  let text = String::from_utf8(out).unwrap();
  assert_eq!(text.lines().count(), 10);
  assert_eq!(text.lines().last(), Some("//# sourceMappingURL=test.js.map"));
}

#[test]
fn missing_files_are_reported_at_the_requiring_directive() {
  let dir = tempdir().unwrap();
  write(dir.path(), "app.js", "//= require widgets\napp();\n");
  let widgets = write(
    dir.path(),
    "widgets.js",
    "// widgets\n//= require ./missing\nwidgets();\n",
  );

  let err = DirectiveResolver::new(NativeFs, [dir.path()])
    .resolve(Path::new("app.js"))
    .unwrap_err();

  let location = err.location().unwrap();
  assert_eq!(location.path, widgets);
  assert_eq!(location.line, 2);
  match err.kind() {
    DirectiveErrorKind::FileNotFound { name, candidates } => {
      assert_eq!(name, "./missing");
      assert!(candidates.contains(&dir.path().join("missing.js")));
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(
    err
      .to_string()
      .starts_with(&format!("in \"{}\" at line 2: Unable to find", widgets.display()))
  );
}

#[test]
fn builder_output_survives_a_map_rewrite() {
  let (dir, lib1, lib2) = fixture();
  let options = BundleOptions {
    out_dir: dir.path().join("dist"),
    source_maps: SourceMapMode::Sidecar,
    inline_sources: true,
    url_prefix: "/".into(),
  };
  let builder = BundleBuilder::new(DirectiveResolver::new(NativeFs, [lib1.clone(), lib2]), options);
  let entry = lib1.join("test.js");
  let summary = builder
    .build(&entry, &builder.output_path_for(&entry, Some(&lib1)))
    .unwrap();
  let map_path = summary.source_map.unwrap();

  // A minifier's map: same sources, no contents, extra keys.
  let minified = dir.path().join("dist/test.min.js.map");
  fs::write(
    &minified,
    r#"{"version":3,"file":"test.min.js","sources":["/test.js","/unknown.js"],"mappings":"AAAA"}"#,
  )
  .unwrap();
  copy_sources_inline(&minified, &map_path).unwrap();

  let rewritten: serde_json::Value =
    serde_json::from_str(&fs::read_to_string(&minified).unwrap()).unwrap();
  let keys: Vec<&str> = rewritten
    .as_object()
    .unwrap()
    .keys()
    .map(String::as_str)
    .collect();
  assert_eq!(keys, vec!["version", "file", "sources", "sourcesContent", "mappings"]);
  assert_eq!(
    rewritten["sourcesContent"],
    serde_json::json!(["//= require somelib\n//= require ./localfile\nhello\n", null])
  );
}
