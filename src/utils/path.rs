//! Page path helpers.

use std::path::{Component, Path, PathBuf};

/// Last segment of a `/`-separated location path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Resolve a relative page path into a normalized relative path.
///
/// Leading `/` and `.` segments are dropped and `..` pops a segment.
/// Returns `None` when `..` would climb above the root.
pub fn normalize_page_path(page: &str) -> Option<PathBuf> {
    let page = page.split(['?', '#']).next().unwrap_or_default();
    let mut out = PathBuf::new();
    for component in Path::new(page).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(out)
}
