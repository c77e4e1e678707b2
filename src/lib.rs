#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod config;
pub mod directives;
pub mod entries;
pub mod error;
pub mod logger;
pub mod models;
pub mod resolver;
pub mod selection;
pub mod source_fs;
pub mod source_map;

pub use builder::{BuildResult, BundleArtifacts, BundleBuilder, BundleOptions, SourceMapMode};
pub use config::BundleConfig;
pub use error::{DirectiveError, DirectiveErrorKind, DirectiveResult, SourceLocation};
pub use models::{BundleSummary, CommentStyle, Directive};
pub use resolver::{DirectiveResolver, ResolutionContext, ResolvedOutput, Segment};
pub use selection::{EntryInclusion, EntrySelection};
pub use source_fs::{MemoryFs, NativeFs, SourceFs};
pub use source_map::SourceMap;
