//! Command-line front end: bundle entries, list their files, or patch source maps.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use directive_bundler::builder::{BundleBuilder, BundleOptions, SourceMapMode};
use directive_bundler::entries::collect_entries;
use directive_bundler::logger::init_logger;
use directive_bundler::source_map::{copy_single_source_inline, copy_sources_inline};
use directive_bundler::{BundleConfig, DirectiveResolver, EntrySelection, NativeFs};
use tracing::{debug, info};

/// Concatenate scripts and stylesheets by following their `require` directives.
#[derive(Parser, Debug)]
#[command(name = "directive-bundler", version, about)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Only report errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  /// Disable colored log output
  #[arg(long, global = true)]
  no_color: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Resolve entries and write their bundles
  Build(BuildArgs),
  /// Print the files an entry pulls in, in output order
  Files(FilesArgs),
  /// Copy original sources into a source map's `sourcesContent`
  InlineSources(InlineSourcesArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
  /// Entry files, or directories scanned for entries
  #[arg(required = true, value_name = "ENTRY")]
  entries: Vec<PathBuf>,

  /// Directory searched for required names, before those from the config file
  #[arg(short = 'I', long = "search-path", value_name = "DIR")]
  search_paths: Vec<PathBuf>,

  /// Directory bundles are written to
  #[arg(long, value_name = "DIR")]
  out_dir: Option<PathBuf>,

  /// Write a `.map` file next to every bundle
  #[arg(long)]
  source_maps: bool,

  /// Embed the source map in the bundle as a data URL
  #[arg(long, conflicts_with = "source_maps")]
  inline_map: bool,

  /// Leave `sourcesContent` out of source maps
  #[arg(long)]
  no_inline_sources: bool,

  /// Prefix for source names recorded in source maps
  #[arg(long, value_name = "PREFIX")]
  url_prefix: Option<String>,

  /// Configuration file to use instead of `directives.config.json`
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Write a JSON summary of every bundle to this file
  #[arg(long, value_name = "FILE")]
  manifest: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FilesArgs {
  /// Entry file
  entry: PathBuf,

  /// Directory searched for required names
  #[arg(short = 'I', long = "search-path", value_name = "DIR")]
  search_paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct InlineSourcesArgs {
  /// Source map to rewrite in place
  target_map: PathBuf,

  #[command(flatten)]
  from: InlineFrom,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InlineFrom {
  /// Copy contents from another map, matched by source name
  #[arg(long, value_name = "MAP")]
  from_map: Option<PathBuf>,

  /// Use the text of a single file as the only source
  #[arg(long, value_name = "FILE")]
  from_source: Option<PathBuf>,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logger(cli.verbose, cli.quiet, cli.no_color);

  let result = match cli.command {
    Command::Build(args) => build(args),
    Command::Files(args) => files(args),
    Command::InlineSources(args) => inline_sources(args),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn build(args: BuildArgs) -> Result<()> {
  let cwd = std::env::current_dir().context("failed to read the working directory")?;
  let (config, project_dir) = match &args.config {
    Some(path) => {
      let path = std::path::absolute(path)?;
      let config = BundleConfig::from_path(&path)
        .ok_or_else(|| anyhow!("failed to load configuration from {}", path.display()))?;
      let project_dir = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
      (config, project_dir)
    }
    None => (BundleConfig::discover(&cwd), cwd),
  };
  debug!(?config, project_dir = %project_dir.display(), "loaded configuration");

  let mut search_paths = absolute_all(&args.search_paths)?;
  search_paths.extend(config.search_path_dirs(&project_dir));

  let source_maps = if args.inline_map {
    SourceMapMode::Inline
  } else if args.source_maps || config.source_maps {
    SourceMapMode::Sidecar
  } else {
    SourceMapMode::Disabled
  };
  let options = BundleOptions {
    out_dir: match &args.out_dir {
      Some(dir) => std::path::absolute(dir)?,
      None => config.out_dir_path(&project_dir),
    },
    source_maps,
    inline_sources: config.inline_sources && !args.no_inline_sources,
    url_prefix: args.url_prefix.clone().unwrap_or(config.url_prefix.clone()),
  };

  let selection_path = config.selection_file_path(&project_dir);
  let selection = EntrySelection::load_from_path(&selection_path)?;
  if !selection.is_unfiltered() {
    info!(path = %selection_path.display(), "applying entry selection");
  }

  let builder = BundleBuilder::new(DirectiveResolver::new(NativeFs, search_paths), options);
  let mut summaries = Vec::new();
  for entry in absolute_all(&args.entries)? {
    if entry.is_dir() {
      let found = collect_entries(&entry, &config.extensions, &selection)
        .with_context(|| format!("failed to scan {}", entry.display()))?;
      for file in found {
        let output = builder.output_path_for(&file, Some(&entry));
        summaries.push(builder.build(&file, &output)?);
      }
    } else {
      let output = builder.output_path_for(&entry, None);
      summaries.push(builder.build(&entry, &output)?);
    }
  }
  info!(bundles = summaries.len(), "build finished");

  if let Some(manifest) = &args.manifest {
    let json = serde_json::to_string_pretty(&summaries)?;
    fs::write(manifest, json)
      .with_context(|| format!("failed to write manifest {}", manifest.display()))?;
  }
  Ok(())
}

fn files(args: FilesArgs) -> Result<()> {
  let cwd = std::env::current_dir().context("failed to read the working directory")?;
  let config = BundleConfig::discover(&cwd);
  let mut search_paths = absolute_all(&args.search_paths)?;
  search_paths.extend(config.search_path_dirs(&cwd));

  let entry = std::path::absolute(&args.entry)?;
  let resolved = DirectiveResolver::new(NativeFs, search_paths).resolve(&entry)?;

  let mut stdout = io::stdout().lock();
  for path in resolved.file_list() {
    writeln!(stdout, "{}", path.display())?;
  }
  Ok(())
}

fn inline_sources(args: InlineSourcesArgs) -> Result<()> {
  if let Some(map) = &args.from.from_map {
    copy_sources_inline(&args.target_map, map)?;
  } else if let Some(source) = &args.from.from_source {
    copy_single_source_inline(&args.target_map, source)?;
  }
  info!(map = %args.target_map.display(), "inlined sources");
  Ok(())
}

fn absolute_all(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
  paths.iter().map(std::path::absolute).collect()
}
