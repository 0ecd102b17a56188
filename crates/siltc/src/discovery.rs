//! Recursive `.silt` file discovery for multi-file invocations of the driver.
//!
//! Adapted from `meshc/src/discovery.rs`'s directory walk; the path-to-
//! module-name half of that file has no counterpart here (`silt-scope`'s
//! `module_path` module already validates declared module names against
//! file placement in the opposite direction) so only the walk survives.

use std::path::{Path, PathBuf};

/// Recursively discover all `.silt` files in a project directory.
///
/// Returns paths relative to `project_root`, sorted alphabetically for
/// determinism. Hidden directories (names starting with `.`) are skipped.
pub fn discover_silt_files(project_root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    discover_recursive(project_root, project_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn discover_recursive(root: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        let name_str = entry.file_name().to_string_lossy().into_owned();

        if name_str.starts_with('.') {
            continue;
        }

        if entry_path.is_dir() {
            discover_recursive(root, &entry_path, files)?;
        } else if entry_path.extension().and_then(|e| e.to_str()) == Some("silt") {
            let relative = entry_path.strip_prefix(root).unwrap_or(&entry_path).to_path_buf();
            files.push(relative);
        }
    }
    Ok(())
}
