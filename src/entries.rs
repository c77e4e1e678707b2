//! Directory scanning for bundle entry points.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::selection::EntryInclusion;

/// Walk `dir` collecting files with one of `extensions` that `selection` accepts.
///
/// Entries are matched against the selection by their `/`-separated path relative to `dir`.
/// Hidden files and directories are skipped. The result is sorted.
pub fn collect_entries<S: EntryInclusion + ?Sized>(
    dir: &Path,
    extensions: &[String],
    selection: &S,
) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    collect_entries_recursively(dir, Path::new(""), extensions, selection, &mut entries)?;
    entries.sort();
    Ok(entries)
}

fn collect_entries_recursively<S: EntryInclusion + ?Sized>(
    dir: &Path,
    relative_root: &Path,
    extensions: &[String],
    selection: &S,
    entries: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let name_str = file_name.to_string_lossy();
        if name_str.starts_with('.') {
            continue;
        }

        let next_relative = relative_root.join(&file_name);
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_entries_recursively(
                &entry.path(),
                &next_relative,
                extensions,
                selection,
                entries,
            )?;
        } else if file_type.is_file()
            && extensions
                .iter()
                .any(|extension| name_str.ends_with(extension.as_str()))
        {
            let rel_path_str = next_relative.to_string_lossy().replace('\\', "/");
            if selection.is_included(&rel_path_str) {
                entries.push(entry.path());
            }
        }
    }

    Ok(())
}
