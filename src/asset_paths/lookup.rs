use std::path::{Path, PathBuf};

use crate::error::{DirectiveErrorKind, DirectiveResult};
use crate::source_fs::SourceFs;

use super::generate_path_candidates;

/// Resolve `name`, required from `context`, to the first candidate that exists.
///
/// When nothing matches, the error lists every candidate in the order it was tried.
pub fn find_source<F: SourceFs + ?Sized>(
    fs: &F,
    name: &str,
    context: &Path,
    search_paths: &[PathBuf],
) -> DirectiveResult<PathBuf> {
    let candidates = generate_path_candidates(name, context, search_paths);
    if let Some(found) = candidates.iter().find(|candidate| fs.exists(candidate)) {
        return Ok(found.clone());
    }

    Err(DirectiveErrorKind::FileNotFound {
        name: name.to_string(),
        candidates,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::find_source;
    use crate::source_fs::MemoryFs;
    use std::path::{Path, PathBuf};

    fn fs() -> MemoryFs {
        MemoryFs::new()
            .with_file("/home/lib1/testfile.js", "")
            .with_file("/home/lib1/testfile2.js", "")
            .with_file("/home/lib2/shared.js", "")
    }

    fn search_paths() -> Vec<PathBuf> {
        vec![PathBuf::from("/home/lib1"), PathBuf::from("/home/lib2")]
    }

    #[test]
    fn finds_files_in_search_paths() {
        let found = find_source(&fs(), "testfile.js", Path::new("/"), &search_paths()).unwrap();
        assert_eq!(found, PathBuf::from("/home/lib1/testfile.js"));

        let found = find_source(&fs(), "shared", Path::new("/a.js"), &search_paths()).unwrap();
        assert_eq!(found, PathBuf::from("/home/lib2/shared.js"));
    }

    #[test]
    fn finds_relative_files() {
        let found = find_source(
            &fs(),
            "./testfile2",
            Path::new("/home/lib1/testfile.js"),
            &search_paths(),
        )
        .unwrap();
        assert_eq!(found, PathBuf::from("/home/lib1/testfile2.js"));
    }

    #[test]
    fn reports_every_candidate_when_missing() {
        let err = find_source(&fs(), "nope", Path::new("/a.js"), &search_paths()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find \"nope\", looked in:\n  /home/lib1/nope\n  /home/lib1/nope.js\n  /home/lib2/nope\n  /home/lib2/nope.js"
        );
    }
}
