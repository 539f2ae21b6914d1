//! Module resolution — specifier + importer → canonical id.
//!
//! The canonical id is the lexically normalized path of the file the
//! specifier denotes, with forward-slash separators. It is the dedup
//! key for the whole graph: two spellings of the same file must
//! normalize to the same id or fan-in never collapses.

use std::path::{Component, Path, PathBuf};

use crate::error::{BundleError, Result};

/// Extensions probed, in order, when a specifier omits its own.
const EXTENSION_CANDIDATES: &[&str] = &["js", "mjs", "cjs"];

/// Resolve an import specifier against the module that wrote it.
///
/// Resolution is always relative to the importing module's own
/// directory, never to the entry file. Bare specifiers (package names)
/// are not supported and fail like any other miss.
pub fn resolve(specifier: &str, importer: &Path) -> Result<String> {
    if !is_relative(specifier) {
        return Err(unresolved(specifier, importer, PathBuf::from(specifier)));
    }

    let base = importer.parent().unwrap_or_else(|| Path::new("."));
    let joined = normalize(&base.join(specifier));

    match probe(&joined) {
        Some(found) => Ok(canonical_id(&found)),
        None => Err(unresolved(specifier, importer, joined)),
    }
}

/// Resolve the entry file itself to its canonical id.
pub fn resolve_entry(entry: &Path) -> Result<String> {
    let normalized = normalize(entry);
    match probe(&normalized) {
        Some(found) => Ok(canonical_id(&found)),
        None => Err(unresolved(
            &entry.display().to_string(),
            Path::new("."),
            normalized,
        )),
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

/// Probe disk candidates for a normalized path, in a fixed order:
/// the path as written, then with each known extension appended, then
/// as a directory containing `index.js`.
fn probe(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    for ext in EXTENSION_CANDIDATES {
        let with_ext = append_extension(path, ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    let index = path.join("index.js");
    if index.is_file() {
        return Some(index);
    }
    None
}

/// Append an extension without clobbering dots in the file stem.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push('.');
    name.push_str(ext);
    path.with_file_name(name)
}

/// Lexically normalize a path: drop `.` segments, fold `..` into the
/// preceding segment where one exists.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Canonical id string: normalized path with forward-slash separators.
fn canonical_id(path: &Path) -> String {
    normalize(path).to_string_lossy().replace('\\', "/")
}

fn unresolved(specifier: &str, importer: &Path, candidate: PathBuf) -> BundleError {
    BundleError::UnresolvedModule {
        specifier: specifier.to_string(),
        importer: importer.to_path_buf(),
        candidate,
    }
}
