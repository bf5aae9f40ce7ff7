use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("a valid regex"));

/// The directory receiving the documents split out of `path`:
/// `<dir>/<file name without extension>`.
pub(crate) fn split_directory(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    path.parent().unwrap_or_else(|| Path::new("")).join(stem)
}

/// The extension of `path` with its leading dot, or an empty string.
pub(crate) fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// The path with `/` separators, as used for navigation hrefs.
pub(crate) fn logical_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Replaces characters that cannot appear in a file name.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let sanitized = INVALID_CHARS.replace_all(name.trim(), "_");
    match sanitized.trim_matches('.') {
        "" => "_".to_string(),
        _ => sanitized.into_owned(),
    }
}

/// Hands out file names unique inside one directory.
///
/// Names are compared case-insensitively; a taken name gets a `-1`, `-2`, ...
/// suffix.
#[derive(Debug, Default)]
pub(crate) struct FileNameAllocator {
    taken: HashSet<String>,
}

impl FileNameAllocator {
    pub(crate) fn allocate(&mut self, name: &str, extension: &str) -> String {
        let base = sanitize_file_name(name);
        let mut candidate = format!("{base}{extension}");
        let mut suffix = 0_usize;
        while !self.taken.insert(candidate.to_lowercase()) {
            suffix += 1;
            candidate = format!("{base}-{suffix}{extension}");
        }
        candidate
    }
}
