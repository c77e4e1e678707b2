//! Version 3 source maps with one mapping segment per generated line.

mod inline;
mod map;
pub mod vlq;

pub use inline::{
  SourceMapFileError, copy_single_source_inline, copy_sources_inline, splice_sources_content,
};
pub use map::{SourceMap, SourceMapDocument};
