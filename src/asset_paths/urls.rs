use std::path::{Path, PathBuf};

/// Identifier recorded for `path` in a source map.
///
/// Files under a search path are addressed as `prefix` followed by their path relative to
/// the first search path containing them. Anything else falls back to its file name. The
/// result always uses forward slashes.
pub fn source_url(path: &Path, search_paths: &[PathBuf], prefix: &str) -> String {
    for search_path in search_paths {
        if let Ok(relative) = path.strip_prefix(search_path) {
            let relative = relative.to_string_lossy().replace('\\', "/");
            return format!("{prefix}{}", relative.trim_start_matches('/'));
        }
    }

    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::source_url;
    use std::path::{Path, PathBuf};

    fn search_paths() -> Vec<PathBuf> {
        vec![PathBuf::from("/lib1"), PathBuf::from("/lib2")]
    }

    #[test]
    fn prefixes_paths_relative_to_their_search_path() {
        assert_eq!(
            source_url(Path::new("/lib1/sub/morelocal.js"), &search_paths(), "/"),
            "/sub/morelocal.js"
        );
        assert_eq!(
            source_url(Path::new("/lib2/somelib.js"), &search_paths(), "/static/"),
            "/static/somelib.js"
        );
    }

    #[test]
    fn falls_back_to_the_file_name() {
        assert_eq!(
            source_url(Path::new("/elsewhere/app.js"), &search_paths(), "/"),
            "app.js"
        );
    }

    #[test]
    fn matches_whole_path_components_only() {
        assert_eq!(
            source_url(Path::new("/lib10/app.js"), &search_paths(), "/"),
            "app.js"
        );
    }
}
