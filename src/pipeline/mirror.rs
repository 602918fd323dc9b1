//! Output tree creation ahead of encoding.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::DirectoryInfo;
use crate::engine::tools::map_path;

/// Create `output_root` and the counterpart of every directory in `input` under it.
/// Existing directories are left alone, so running this twice is harmless.
/// Returns the number of directories ensured (root included).
pub fn mirror_tree(input: &DirectoryInfo, output_root: &Path) -> Result<usize> {
    std::fs::create_dir_all(output_root)
        .with_context(|| format!("create output root {}", output_root.display()))?;
    let mut ensured = 1;
    for sub_dir in &input.sub_directories {
        let out_dir = map_path(&input.path, output_root, sub_dir, true);
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("create output directory {}", out_dir.display()))?;
        ensured += 1;
    }
    debug!(
        "Mirrored {} directories under {}",
        ensured,
        output_root.display()
    );
    Ok(ensured)
}
