//! Directory scan: one sequential walk that counts directories, classifies files by content,
//! and maps each file onto the output root.

use anyhow::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::engine::tools::{check_root_and_canonicalize, is_strictly_under, map_path};
use crate::pipeline::sniff::classify_file;
use crate::{DirectoryInfo, FileRecord, ImageKind};

/// One result from a directory walk: an entry to record or an error with its depth and path.
pub enum WalkOutcome {
    Ok(walkdir::DirEntry),
    Err {
        msg: String,
        path: Option<PathBuf>,
        depth: usize,
    },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok(entry),
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
            depth: err.depth(),
        },
    }
}

/// Sorted, non-following walk of `root`. The output root is pruned when it sits inside `root`
/// so earlier results are not picked up as inputs.
fn walkdir_iter<'a>(
    root: &'a Path,
    prune: Option<&'a Path>,
) -> impl Iterator<Item = WalkOutcome> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| prune.is_none_or(|p| e.path() != p))
        .map(to_outcome_walkdir)
}

/// Scan `root` into a [`DirectoryInfo`].
///
/// With `output_root`, each file gets its destination from [`map_path`]; without it
/// (accounting scans) `output_path` stays `None`.
///
/// Unreadable files are recorded as [`ImageKind::Unknown`]; unreadable entries below the root
/// are logged and listed in `skipped`. Only a failure on the root itself is returned as an error.
pub fn scan_dir(root: &Path, output_root: Option<&Path>) -> Result<DirectoryInfo> {
    let root = check_root_and_canonicalize(root)?;
    let prune = output_root.filter(|out| is_strictly_under(out, &root));
    if let Some(p) = prune {
        debug!("Output root {} is inside the input; skipping it", p.display());
    }

    let mut info = DirectoryInfo::empty(root.clone());
    for outcome in walkdir_iter(&root, prune) {
        match outcome {
            WalkOutcome::Ok(entry) => record_entry(&mut info, entry, &root, output_root),
            WalkOutcome::Err { msg, depth: 0, .. } => {
                anyhow::bail!("cannot read {}: {}", root.display(), msg);
            }
            WalkOutcome::Err { msg, path, .. } => {
                let path = path.unwrap_or_else(|| root.clone());
                warn!("Skipping {}: {}", path.display(), msg);
                info.skipped.push((path, msg));
            }
        }
    }
    debug!(
        "Scanned {}: {} files, {} dirs, {} bytes",
        root.display(),
        info.file_count,
        info.dir_count,
        info.total_size
    );
    Ok(info)
}

fn record_entry(
    info: &mut DirectoryInfo,
    entry: walkdir::DirEntry,
    root: &Path,
    output_root: Option<&Path>,
) {
    if entry.depth() == 0 {
        return;
    }
    let file_type = entry.file_type();
    if file_type.is_dir() {
        info.record_dir(entry.into_path());
        return;
    }

    // Symlinked files are read through the link; symlinked directories are not descended.
    let meta = if file_type.is_symlink() {
        match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => Ok(meta),
            _ => {
                debug!("Ignoring link {}", entry.path().display());
                return;
            }
        }
    } else if file_type.is_file() {
        entry.metadata().map_err(anyhow::Error::from)
    } else {
        debug!("Ignoring non-regular entry {}", entry.path().display());
        return;
    };

    let size = match meta {
        Ok(meta) => meta.len(),
        Err(err) => {
            warn!("Cannot stat {}: {}", entry.path().display(), err);
            0
        }
    };
    let path = entry.into_path();
    let kind = classify_file(&path).unwrap_or_else(|err| {
        warn!("Classifying as unknown: {:#}", err);
        ImageKind::Unknown
    });
    let output_path = output_root.map(|out| map_path(root, out, &path, false));
    info.record_file(FileRecord {
        input_path: path,
        output_path,
        kind,
        size,
    });
}
