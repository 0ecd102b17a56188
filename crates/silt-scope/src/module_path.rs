//! Validates that a declared module's qualified name matches its file's
//! position in the directory tree: `A.B.C` must live at `A/B/C.silt`
//! relative to the compilation root.
//!
//! Adapted from `meshc/src/discovery.rs`'s path/module-name conversion, run
//! in the opposite direction: discovery turns a file path into the module
//! name a driver should expect, this turns a declared module name into the
//! file path it requires and compares.

use std::path::{Path, PathBuf};

use crate::names::Name;

/// Builds the file path a module named by `segments` (outer-to-inner) is
/// required to live at, relative to the compilation root.
pub fn expected_file_path(segments: &[Name]) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in segments {
        path.push(segment.as_str());
    }
    path.set_extension("silt");
    path
}

/// `true` if `relative_file` (the source file's path relative to the
/// compilation root) matches the file `segments` would require.
pub fn matches_directory_layout(segments: &[Name], relative_file: &Path) -> bool {
    expected_file_path(segments) == relative_file
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::span::Span;

    fn name(s: &str) -> Name {
        Name::new(s, Span::empty_at(0))
    }

    #[test]
    fn single_segment_module_matches_direct_file() {
        let segments = vec![name("M")];
        assert!(matches_directory_layout(&segments, Path::new("M.silt")));
        assert!(!matches_directory_layout(&segments, Path::new("N.silt")));
    }

    #[test]
    fn nested_module_matches_nested_directory() {
        let segments = vec![name("A"), name("B"), name("C")];
        assert!(matches_directory_layout(&segments, Path::new("A/B/C.silt")));
        assert!(!matches_directory_layout(&segments, Path::new("A/C.silt")));
    }
}
