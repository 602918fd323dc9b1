//! Path utilities: output-path mapping and root resolution.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::utils::config::EncodeDefaults;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// `path` relative to `root`. For a path outside `root` only its normal components are kept,
/// so the result can always be joined under another root.
fn relative_or_components(path: &Path, root: &Path) -> PathBuf {
    path_relative_to(path, root).unwrap_or_else(|| {
        path.components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    })
}

fn join_under(root: &Path, rel: &Path) -> PathBuf {
    if rel.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(rel)
    }
}

/// Strip the extension (from the last `.`) unless that would leave nothing.
/// `photo.jpg` -> `photo`, `a.tar.gz` -> `a.tar`, `.hidden` -> `.hidden`, `noext` -> `noext`.
pub fn trim_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Destination for `path` when re-rooting `input_root` onto `output_root`.
///
/// Directories keep their name. Files keep their directory and base name but get the WebP
/// extension in place of their own. Only meaningful for paths under `input_root`.
pub fn map_path(input_root: &Path, output_root: &Path, path: &Path, is_dir: bool) -> PathBuf {
    if is_dir {
        return join_under(output_root, &relative_or_components(path, input_root));
    }
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let out_dir = join_under(output_root, &relative_or_components(parent, input_root));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    out_dir.join(format!(
        "{}.{}",
        trim_extension(&name),
        EncodeDefaults::OUTPUT_EXTENSION
    ))
}

/// Canonicalize `path` and require it to be a readable directory.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize {}", path.display()))?;
    let meta = std::fs::metadata(&canonical)
        .with_context(|| format!("read metadata of {}", canonical.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Not a directory: {}", canonical.display());
    }
    Ok(canonical)
}

/// Absolute form of `path`: canonical when it exists, otherwise made absolute against the
/// working directory without touching the filesystem.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }
    std::path::absolute(path).with_context(|| format!("absolute path of {}", path.display()))
}

/// True when `path` is strictly below `root`.
pub fn is_strictly_under(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}
