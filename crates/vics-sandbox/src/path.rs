//! Path normalization and workspace-relative resolution.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::SandboxPath;

/// Symlink hops followed before a chain is treated as hostile
const MAX_LINK_DEPTH: usize = 40;

/// Convert a path to a display string with forward slash separators.
pub fn path_to_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Normalize a path by resolving `.` and `..` components without filesystem access.
///
/// `..` at the root is dropped, so `/../../etc` becomes `/etc`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => {
                components.retain(|c| matches!(c, Component::Prefix(_)));
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::Normal(_) | Component::CurDir) => {
                    components.pop();
                }
                Some(Component::ParentDir) | None => components.push(Component::ParentDir),
            },
            Component::Normal(c) => components.push(Component::Normal(c)),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Resolve `requested` against a canonical `root`.
///
/// An absolute `requested` replaces the root entirely, mirroring `Path::join`.
/// Symlinks are followed for every component that exists, so a link inside the
/// workspace that points elsewhere resolves to where it really lands.
pub(crate) fn resolve_within(root: &Path, requested: &Path) -> SandboxPath {
    let joined = normalize_path(&root.join(requested));
    let target = resolve_symlinks(&joined, 0);
    SandboxPath {
        within_root: target.starts_with(root),
        target,
    }
}

/// Canonicalize the longest existing ancestor of `path` and re-append the rest.
fn resolve_symlinks(path: &Path, depth: usize) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut rest: Vec<OsString> = Vec::new();

    loop {
        if let Ok(canonical) = dunce::canonicalize(&existing) {
            let mut out = canonical;
            for name in rest.iter().rev() {
                out.push(name);
            }
            return normalize_path(&out);
        }

        // Dangling link: canonicalize fails but the link itself is there
        if depth < MAX_LINK_DEPTH
            && let Ok(link) = std::fs::read_link(&existing)
        {
            let base = existing.parent().map(Path::to_path_buf).unwrap_or_default();
            let mut next = normalize_path(&base.join(link));
            for name in rest.iter().rev() {
                next.push(name);
            }
            return resolve_symlinks(&next, depth + 1);
        }

        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
}
