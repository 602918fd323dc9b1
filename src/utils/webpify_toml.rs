//! Load `.webpify.toml` from a directory (CLI only). Lib callers pass [`EncodeSettings`] directly.

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::config::{EncodeDefaults, PackagePaths};
use crate::{EnabledKinds, EncodeSettings};

#[derive(Debug, Default, Deserialize)]
pub struct WebpifyToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    quality: Option<u8>,
    lossless: Option<bool>,
    jpegs: Option<bool>,
    pngs: Option<bool>,
    gifs: Option<bool>,
    workers: Option<usize>,
    cwebp: Option<String>,
    verbose: Option<bool>,
}

impl WebpifyToml {
    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }

    pub fn cwebp(&self) -> Option<PathBuf> {
        self.settings.cwebp.as_ref().map(PathBuf::from)
    }

    /// Per-kind flags as written in the file (None when absent).
    pub fn kind_flags(&self) -> KindFlags {
        let s = &self.settings;
        (s.jpegs, s.pngs, s.gifs)
    }
}

/// Read the config file from `dir`. `Ok(None)` when the file is missing; `Err` when it cannot be parsed.
pub fn read_webpify_toml(dir: &Path) -> Result<Option<WebpifyToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let parsed = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(parsed))
}

/// Overwrite a settings field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $settings:expr, $field:ident) => {
        if let Some(v) = $section.$field {
            $settings.$field = v;
        }
    };
}

/// Apply file config to settings (only fields present in the file). Call before applying CLI.
/// An out-of-range value is warned about and skipped.
/// Kind flags are resolved by the caller together with the CLI flags.
pub fn apply_file_to_settings(file: &WebpifyToml, settings: &mut EncodeSettings) {
    let section = &file.settings;
    match section.quality {
        Some(q) if q > EncodeDefaults::MAX_QUALITY => warn!(
            "{}: ignoring quality {} (must be 0-{})",
            PackagePaths::get().config_filename(),
            q,
            EncodeDefaults::MAX_QUALITY
        ),
        _ => apply_file_opt!(section, settings, quality),
    }
    apply_file_opt!(section, settings, lossless);
    if section.workers.is_some() {
        settings.workers = section.workers;
    }
}

pub type KindFlags = (Option<bool>, Option<bool>, Option<bool>);

/// Resolve the per-kind flags. Any kind flag on the CLI replaces the file's kind flags as a set.
/// With nothing set anywhere, all kinds are on. Otherwise an unset kind follows the others:
/// off when some kind was explicitly enabled (`--pngs`), on when kinds were only disabled
/// (`--jpegs false`).
pub fn resolve_kinds(cli: KindFlags, file: KindFlags) -> EnabledKinds {
    let any_cli = cli.0.is_some() || cli.1.is_some() || cli.2.is_some();
    let (jpeg, png, gif) = if any_cli { cli } else { file };
    if jpeg.is_none() && png.is_none() && gif.is_none() {
        return EnabledKinds::default();
    }
    let unset = ![jpeg, png, gif].contains(&Some(true));
    EnabledKinds {
        jpeg: jpeg.unwrap_or(unset),
        png: png.unwrap_or(unset),
        gif: gif.unwrap_or(unset),
    }
}
