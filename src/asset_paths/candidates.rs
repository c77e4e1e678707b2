use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Generate the ordered list of paths a required `name` may refer to.
///
/// Absolute names are used as given. Names starting with `./` or `../` are taken relative to
/// the directory of `context`, the file holding the directive. Anything else is looked up in
/// every search path in turn. When `name` lacks the extension of `context`, each location is
/// tried both as written and with that extension appended.
pub fn generate_path_candidates(
    name: &str,
    context: &Path,
    search_paths: &[PathBuf],
) -> Vec<PathBuf> {
    let mut builder = CandidateBuilder::new(name, context);

    if Path::new(name).is_absolute() {
        builder.add_location(PathBuf::from(name));
    } else if name.starts_with("./") || name.starts_with("../") {
        let base = context.parent().unwrap_or(context);
        builder.add_location(base.join(name));
    } else {
        for search_path in search_paths {
            builder.add_location(search_path.join(name));
        }
    }

    builder.finish()
}

struct CandidateBuilder {
    extension: Option<OsString>,
    seen: BTreeSet<PathBuf>,
    result: Vec<PathBuf>,
}

impl CandidateBuilder {
    fn new(name: &str, context: &Path) -> Self {
        let extension = context
            .extension()
            .map(|ext| {
                let mut dotted = OsString::from(".");
                dotted.push(ext);
                dotted
            })
            .filter(|dotted| !name.ends_with(&*dotted.to_string_lossy()));

        Self {
            extension,
            seen: BTreeSet::new(),
            result: Vec::new(),
        }
    }

    fn add_location(&mut self, location: PathBuf) {
        let location = path_clean::clean(location);
        if let Some(extension) = &self.extension {
            let mut with_extension = location.clone().into_os_string();
            with_extension.push(extension);
            self.push(location);
            self.push(PathBuf::from(with_extension));
        } else {
            self.push(location);
        }
    }

    fn finish(self) -> Vec<PathBuf> {
        self.result
    }

    fn push(&mut self, candidate: PathBuf) {
        if self.seen.insert(candidate.clone()) {
            self.result.push(candidate);
        }
    }
}
