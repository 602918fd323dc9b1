//! Content-based image classification from magic bytes.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ImageKind;
use crate::utils::config::HEADER_SNIFF_LEN;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47];
const GIF_MAGIC: &[u8] = b"GIF8";

/// Classify a file header. Anything shorter than a signature or not matching one is `Unknown`.
pub fn sniff_kind(header: &[u8]) -> ImageKind {
    if header.starts_with(JPEG_MAGIC) {
        ImageKind::Jpeg
    } else if header.starts_with(PNG_MAGIC) {
        ImageKind::Png
    } else if header.starts_with(GIF_MAGIC)
        && matches!(header.get(4..6), Some([b'7' | b'9', b'a']))
    {
        ImageKind::Gif
    } else {
        ImageKind::Unknown
    }
}

/// Read up to [`HEADER_SNIFF_LEN`] bytes of `path` and classify them.
pub fn classify_file(path: &Path) -> Result<ImageKind> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut header = Vec::with_capacity(HEADER_SNIFF_LEN as usize);
    file.take(HEADER_SNIFF_LEN)
        .read_to_end(&mut header)
        .with_context(|| format!("read header of {}", path.display()))?;
    Ok(sniff_kind(&header))
}
