//! Recursive `require`/`stub` resolution.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::asset_paths::find_source;
use crate::directives::{HeaderDirectives, HeaderLine};
use crate::error::{DirectiveError, DirectiveErrorKind, DirectiveResult};
use crate::models::Directive;
use crate::source_fs::SourceFs;

use super::{ResolvedOutput, Segment};

/// State shared by every step of one top-level resolution.
///
/// The seen set is never reset between branches: a file reached a second time, through a
/// cycle, a diamond or after being stubbed, contributes nothing.
#[derive(Debug)]
pub struct ResolutionContext<'a> {
  search_paths: &'a [PathBuf],
  seen: BTreeSet<PathBuf>,
}

impl<'a> ResolutionContext<'a> {
  /// Fresh context with nothing seen yet.
  pub fn new(search_paths: &'a [PathBuf]) -> Self {
    Self {
      search_paths,
      seen: BTreeSet::new(),
    }
  }

  /// Directories searched for names that are neither absolute nor relative.
  pub fn search_paths(&self) -> &'a [PathBuf] {
    self.search_paths
  }

  /// Files already emitted or stubbed.
  pub fn seen(&self) -> &BTreeSet<PathBuf> {
    &self.seen
  }

  /// Record `path`, returning `false` if it had already been recorded.
  pub fn mark_seen(&mut self, path: &Path) -> bool {
    self.seen.insert(path.to_path_buf())
  }
}

/// Resolves a root file and its directives into an ordered list of segments.
#[derive(Debug, Clone)]
pub struct DirectiveResolver<F> {
  fs: F,
  search_paths: Vec<PathBuf>,
}

impl<F: SourceFs> DirectiveResolver<F> {
  /// Create a resolver reading through `fs` and searching `search_paths` in order.
  pub fn new<I, P>(fs: F, search_paths: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    Self {
      fs,
      search_paths: search_paths
        .into_iter()
        .map(|path| path_clean::clean(path.into()))
        .collect(),
    }
  }

  /// Search paths after normalisation.
  pub fn search_paths(&self) -> &[PathBuf] {
    &self.search_paths
  }

  /// Resolve `root` with a fresh context.
  ///
  /// A relative `root` is looked up in the search paths like any other required name.
  pub fn resolve(&self, root: &Path) -> DirectiveResult<ResolvedOutput> {
    let mut context = ResolutionContext::new(&self.search_paths);
    let name = root.to_string_lossy();
    let segments = self.resolve_file(&name, Path::new("/"), &mut context)?;
    debug!(
      root = %root.display(),
      files = segments.len(),
      "resolved directive graph"
    );
    Ok(ResolvedOutput::new(segments, self.search_paths.clone()))
  }

  /// Resolve `name` as required from `context_path`, dependencies first.
  ///
  /// Returns nothing if the file was already seen. Errors are tagged with the directive
  /// line that led to them, unless a deeper frame already did so.
  pub fn resolve_file(
    &self,
    name: &str,
    context_path: &Path,
    context: &mut ResolutionContext<'_>,
  ) -> DirectiveResult<Vec<Segment>> {
    let path = find_source(&self.fs, name, context_path, context.search_paths())?;
    if !context.mark_seen(&path) {
      trace!(path = %path.display(), "already resolved, skipping");
      return Ok(Vec::new());
    }

    let mut lines = self
      .fs
      .read_lines(&path)
      .map_err(|err| DirectiveError::io(&path, err))?;

    let mut header = HeaderDirectives::new();
    let mut contents = Vec::new();
    let mut output = Vec::new();
    let mut reached_body = false;

    for (index, line) in lines.by_ref().enumerate() {
      let line_number = index + 1;
      let line = line.map_err(|err| DirectiveError::io(&path, err).annotate(&path, line_number))?;
      let kind = header
        .feed(&line)
        .map_err(|err| err.annotate(&path, line_number))?;
      contents.push(line);

      match kind {
        HeaderLine::Body => {
          reached_body = true;
          break;
        }
        HeaderLine::Header(Some(directive)) => {
          let segments = self
            .execute(&directive, &path, context)
            .map_err(|err| err.annotate(&path, line_number))?;
          output.extend(segments);
        }
        HeaderLine::Header(None) => {}
      }
    }

    if !reached_body {
      header
        .finish()
        .map_err(|(line_number, err)| err.annotate(&path, line_number))?;
    }

    for line in lines {
      contents.push(line.map_err(|err| DirectiveError::io(&path, err))?);
    }
    output.push(Segment::new(path, contents));
    Ok(output)
  }

  fn execute(
    &self,
    directive: &Directive,
    path: &Path,
    context: &mut ResolutionContext<'_>,
  ) -> DirectiveResult<Vec<Segment>> {
    debug!(
      command = %directive.command,
      argument = %directive.argument,
      from = %path.display(),
      "executing directive"
    );
    match directive.command.as_str() {
      "require" => self.resolve_file(&directive.argument, path, context),
      "stub" => {
        // Only the seen-set side effect matters; the segments are dropped.
        self.resolve_file(&directive.argument, path, context)?;
        Ok(Vec::new())
      }
      other => Err(
        DirectiveErrorKind::UnknownDirective {
          command: other.to_string(),
        }
        .into(),
      ),
    }
  }
}
