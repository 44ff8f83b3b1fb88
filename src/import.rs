//! Directory import: raw SVG files become collection entries.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::set::{IconEntry, ImportedSet};

/// Failure to read the source directory or one of its files.
#[derive(Debug, Error)]
#[error("failed to read {path}: {source}")]
pub struct ImportError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ImportError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Imports every `*.svg` file in `dir` as one entry of a new set.
///
/// Each entry is named after its file minus the extension. Files are
/// visited in sorted name order so imports are deterministic regardless of
/// the platform's directory iteration order. Subdirectories and non-SVG
/// files are ignored.
pub fn import_directory(dir: &Path, prefix: &str) -> Result<ImportedSet, ImportError> {
    let mut paths = Vec::new();
    for dir_entry in std::fs::read_dir(dir).map_err(|e| ImportError::new(dir, e))? {
        let dir_entry = dir_entry.map_err(|e| ImportError::new(dir, e))?;
        let path = dir_entry.path();
        if path.is_file() && has_svg_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut set = ImportedSet::new(prefix);
    for path in paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|e| ImportError::new(&path, e))?;
        set.push(IconEntry::icon(name, source));
    }
    Ok(set)
}

fn has_svg_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::IconPipeline;
    use crate::transform::THEMEABLE_COLOR;
    use std::fs;

    #[test]
    fn imports_svg_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zebra.svg"), "<svg viewBox=\"0 0 1 1\"/>").unwrap();
        fs::write(dir.path().join("apple.svg"), "<svg viewBox=\"0 0 1 1\"/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let set = import_directory(dir.path(), "test-icons").unwrap();
        assert_eq!(set.prefix(), "test-icons");
        let names: Vec<_> = set.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["apple", "zebra"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = import_directory(Path::new("/no/such/dir"), "p").unwrap_err();
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn end_to_end_import_and_build() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("foo.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#112233" d="M0 0h24v24z"/></svg>"##,
        )
        .unwrap();
        fs::write(
            dir.path().join("bar.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><defs><linearGradient id="g"><stop offset="0" stop-color="#ff0000"/><stop offset="1" stop-color="#0000ff"/></linearGradient></defs><rect width="24" height="24" fill="url(#g)"/></svg>"##,
        )
        .unwrap();

        let set = import_directory(dir.path(), "fortis-icons").unwrap();
        let document = set.build(&IconPipeline::default());

        assert_eq!(document.icons.len(), 2);
        let foo = &document.icons["foo"];
        assert!(foo.body.contains(THEMEABLE_COLOR));
        assert!(!foo.body.contains("#112233"));
        let bar = &document.icons["bar"];
        assert!(bar.body.contains("#ff0000"));
        assert!(bar.body.contains("#0000ff"));
    }
}
