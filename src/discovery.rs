use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::err_msg;
use crate::errors::FitError;

/// Recursively scans `root` for page files with one of `extensions`.
///
/// A `root` that is itself a file is returned as is. The list is sorted so
/// pages run in a deterministic order.
pub fn discover_pages<P: AsRef<Path>>(root: P, extensions: &[String]) -> Result<Vec<PathBuf>, FitError> {
    let root = root.as_ref();
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut pages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            err_msg!(Io, "Failed to walk directory '{}'", root.display()).with_cause(e)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_page(path, extensions) {
            continue;
        }

        pages.push(path.to_path_buf());
    }
    pages.sort();
    log::debug!("discovered {} page(s) under {}", pages.len(), root.display());
    Ok(pages)
}

fn is_page(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_extensions_case_insensitively() {
        let extensions = vec!["fit".to_string()];
        assert!(is_page(Path::new("pages/MusicDisplay.fit"), &extensions));
        assert!(is_page(Path::new("pages/MusicDisplay.FIT"), &extensions));
        assert!(!is_page(Path::new("pages/notes.md"), &extensions));
        assert!(!is_page(Path::new("pages/Makefile"), &extensions));
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = discover_pages("no/such/dir", &["fit".to_string()]).unwrap_err();
        assert_eq!(err.error_type(), crate::errors::ErrorType::Io);
    }
}
