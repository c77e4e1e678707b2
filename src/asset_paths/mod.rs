//! Turning names written in directives into files on disk, and files on disk into the
//! identifiers recorded in source maps.
//!
//! Candidate generation, lookup and URL mapping live in separate submodules so each rule can
//! be tested on its own without touching the file system.

mod candidates;
mod lookup;
mod urls;

pub use candidates::generate_path_candidates;
pub use lookup::find_source;
pub use urls::source_url;
