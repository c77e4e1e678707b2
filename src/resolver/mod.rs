//! The directive processor proper.
//!
//! [`DirectiveResolver::resolve`] walks `require` and `stub` directives from a root file
//! and returns a [`ResolvedOutput`]: each file exactly once, after everything it requires.
//! The output can then be written raw or with a [`crate::source_map::SourceMap`].

mod engine;
mod output;

pub use engine::{DirectiveResolver, ResolutionContext};
pub use output::{ResolvedOutput, Segment};
