//! Pure path helpers shared by link resolution and navigation.
//!
//! Every path here is a slash-separated string relative to some root (the
//! repository for sources, the site output directory for destinations), except
//! [`clean_path`], which works on native paths. No function touches the
//! filesystem.

use std::path::{Component, Path, PathBuf};

/// Compute a relative href from one file to another.
///
/// Both `from` and `to` are slash-separated paths without leading slash. The
/// last segment of `from` is the current document, so the base directory is
/// everything before it.
///
/// # Examples
///
/// ```
/// use docsmith_renderer::relative_path;
///
/// assert_eq!(relative_path("index.html", "guide.html"), "guide.html");
/// assert_eq!(relative_path("api/index.html", "index.html"), "../index.html");
/// assert_eq!(relative_path("a/b.html", "a/c.html"), "c.html");
/// ```
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    // Trailing slash means the document is empty — all segments are the directory.
    let from_dir = if from.ends_with('/') || from_segs.is_empty() {
        &from_segs[..]
    } else {
        &from_segs[..from_segs.len() - 1]
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dir.len() - common;
    let remaining = &to_segs[common..];

    let ups_part = "../".repeat(ups);
    let down_part = remaining.join("/");

    let result = format!("{ups_part}{down_part}");
    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

/// Collapse `.` and `..` segments of a slash-separated path.
///
/// Returns `None` when a `..` segment would climb above the root.
///
/// # Examples
///
/// ```
/// use docsmith_renderer::normalize_path;
///
/// assert_eq!(normalize_path("docs/./api/../guide.md"), Some("docs/guide.md".to_owned()));
/// assert_eq!(normalize_path("../outside.md"), None);
/// ```
pub fn normalize_path(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(component),
        }
    }
    Some(segments.join("/"))
}

/// Lexically remove `.` and `..` components from a native path.
///
/// `..` directly under the root is dropped; a leading `..` on a relative path
/// is kept. Symlinks are not resolved.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use docsmith_renderer::clean_path;
///
/// assert_eq!(clean_path(Path::new("/repo/./docs/../out")), Path::new("/repo/out"));
/// assert_eq!(clean_path(Path::new("../site")), Path::new("../site"));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Directory portion of a slash-separated path (`""` for top-level files).
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Join a directory and a relative path without normalizing.
pub(crate) fn join_path(dir: &str, rel: &str) -> String {
    if dir.is_empty() {
        rel.to_owned()
    } else {
        format!("{dir}/{rel}")
    }
}

/// Last path segment.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Extension of the last path segment, without the dot.
pub(crate) fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

/// Replace the extension of the last path segment (or append one).
pub(crate) fn with_extension(path: &str, ext: &str) -> String {
    let name = file_name(path);
    let stem_len = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.len(),
        _ => name.len(),
    };
    let cut = path.len() - name.len() + stem_len;
    format!("{}.{ext}", &path[..cut])
}
