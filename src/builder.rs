//! Bundle build orchestrator: resolves an entry, renders it and writes the results.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use same_file::is_same_file;
use tracing::info;

use crate::models::{BundleSummary, CommentStyle};
use crate::resolver::DirectiveResolver;
use crate::source_fs::SourceFs;
use crate::source_map::SourceMap;

/// Generic build result type used by the orchestration layer.
pub type BuildResult<T> = Result<T>;

/// How a bundle's source map is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMapMode {
  /// No source map and no trailing comment.
  #[default]
  Disabled,
  /// A `<output>.map` file next to the bundle.
  Sidecar,
  /// A base64 `data:` URL in the trailing comment.
  Inline,
}

/// Settings shared by every bundle a builder writes.
#[derive(Debug, Clone)]
pub struct BundleOptions {
  /// Directory bundles are written to.
  pub out_dir: PathBuf,
  /// Source map delivery.
  pub source_maps: SourceMapMode,
  /// Whether source maps embed the original sources.
  pub inline_sources: bool,
  /// Prefix of the source identifiers recorded in source maps.
  pub url_prefix: String,
}

impl Default for BundleOptions {
  fn default() -> Self {
    Self {
      out_dir: PathBuf::from("dist"),
      source_maps: SourceMapMode::Disabled,
      inline_sources: true,
      url_prefix: "/".into(),
    }
  }
}

/// A bundle rendered in memory.
pub struct BundleArtifacts {
  /// Concatenated output, including any `sourceMappingURL` comment.
  pub code: String,
  /// Map of `code`, unless source maps are disabled.
  pub source_map: Option<SourceMap>,
  /// Every file included, in emission order.
  pub files: Vec<PathBuf>,
}

/// High-level helper for resolving entries and writing their bundles.
pub struct BundleBuilder<F> {
  resolver: DirectiveResolver<F>,
  options: BundleOptions,
}

impl<F: SourceFs> BundleBuilder<F> {
  /// Create a builder around a resolver.
  pub fn new(resolver: DirectiveResolver<F>, options: BundleOptions) -> Self {
    Self { resolver, options }
  }

  /// The options in effect.
  pub fn options(&self) -> &BundleOptions {
    &self.options
  }

  /// Where the bundle for `entry` goes: its path below `source_root`, or its file name,
  /// inside the output directory.
  pub fn output_path_for(&self, entry: &Path, source_root: Option<&Path>) -> PathBuf {
    let relative = source_root
      .and_then(|root| entry.strip_prefix(root).ok())
      .map(Path::to_path_buf)
      .or_else(|| entry.file_name().map(PathBuf::from))
      .unwrap_or_else(|| entry.to_path_buf());
    self.options.out_dir.join(relative)
  }

  /// Resolve `entry` and render it, naming the sidecar map after `output_name`.
  ///
  /// Nothing is written; a resolution failure leaves no partial output behind.
  pub fn render(&self, entry: &Path, output_name: &str) -> BuildResult<BundleArtifacts> {
    let resolved = self
      .resolver
      .resolve(entry)
      .with_context(|| format!("failed to resolve {}", entry.display()))?;
    let files = resolved.file_list();
    let style = CommentStyle::for_path(entry);
    let prefix = self.options.url_prefix.as_str();

    let mut buffer = Vec::new();
    let source_map = match self.options.source_maps {
      SourceMapMode::Disabled => {
        resolved.write(&mut buffer)?;
        None
      }
      SourceMapMode::Sidecar => {
        let map_url = format!("{output_name}.map");
        Some(resolved.write_with_source_map(&mut buffer, &map_url, style, prefix)?)
      }
      SourceMapMode::Inline => {
        let map = resolved.write_mapped(&mut buffer, prefix)?;
        let data_url = map.to_data_url(self.options.inline_sources);
        buffer.extend_from_slice(style.source_mapping_comment(&data_url).as_bytes());
        Some(map)
      }
    };

    let code = String::from_utf8(buffer)
      .with_context(|| format!("bundle for {} is not valid UTF-8", entry.display()))?;

    Ok(BundleArtifacts {
      code,
      source_map,
      files,
    })
  }

  /// Resolve `entry`, then write the bundle to `output` and its map to `<output>.map`.
  pub fn build(&self, entry: &Path, output: &Path) -> BuildResult<BundleSummary> {
    let output_name = output
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();
    let artifacts = self.render(entry, &output_name)?;

    guard_against_overwrite(output, &artifacts.files)?;
    if let Some(parent) = output.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(output, &artifacts.code)
      .with_context(|| format!("failed to write {}", output.display()))?;

    let mut source_map_path = None;
    if let (SourceMapMode::Sidecar, Some(map)) = (self.options.source_maps, &artifacts.source_map)
    {
      let map_path = sidecar_path(output);
      let file = fs::File::create(&map_path)
        .with_context(|| format!("failed to create {}", map_path.display()))?;
      map
        .dump(file, self.options.inline_sources)
        .with_context(|| format!("failed to write {}", map_path.display()))?;
      source_map_path = Some(map_path);
    }

    info!(
      entry = %entry.display(),
      output = %output.display(),
      files = artifacts.files.len(),
      "wrote bundle"
    );

    Ok(BundleSummary {
      entry: entry.to_path_buf(),
      output: output.to_path_buf(),
      source_map: source_map_path,
      files: artifacts.files,
    })
  }
}

fn sidecar_path(output: &Path) -> PathBuf {
  let mut path = output.as_os_str().to_owned();
  path.push(".map");
  PathBuf::from(path)
}

fn guard_against_overwrite(output: &Path, inputs: &[PathBuf]) -> BuildResult<()> {
  if !output.exists() {
    return Ok(());
  }
  for input in inputs {
    if input.exists() && is_same_file(input, output)? {
      bail!(
        "refusing to overwrite {} with a bundle that includes it",
        input.display()
      );
    }
  }
  Ok(())
}
