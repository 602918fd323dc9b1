//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Config file looked up in the working directory (e.g. `.webpify.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Worker threads ----

/// Thread limits for the encode pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
}

impl WorkerThreadLimits {
    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
        }
    }
}

// ---- Encoding ----

/// Defaults handed to the encoder when neither the config file nor the CLI sets them.
pub struct EncodeDefaults;

impl EncodeDefaults {
    pub const QUALITY: u8 = 80;
    pub const MAX_QUALITY: u8 = 100;
    /// External encoder binary, resolved through PATH.
    pub const CWEBP_PROGRAM: &'static str = "cwebp";
    /// Extension given to every encoded output file.
    pub const OUTPUT_EXTENSION: &'static str = "webp";
}

// ---- Classification ----

/// Bytes read from the start of each file for signature matching. Covers every supported signature.
pub const HEADER_SNIFF_LEN: u64 = 261;
