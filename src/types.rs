//! Public and internal types for the webpify API and pipeline.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{EncodeDefaults, WorkerThreadLimits};

/// Image kind decided from a file's leading bytes. The extension is never consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Unknown,
}

/// One file's identity within a scan.
#[derive(Clone, Debug)]
pub struct FileRecord {
    pub input_path: PathBuf,
    /// Destination path, set only when the scan was given an output root to map onto.
    pub output_path: Option<PathBuf>,
    pub kind: ImageKind,
    /// Byte length at scan time.
    pub size: u64,
}

/// Snapshot of one directory subtree, built by a single walk.
///
/// Two snapshots of the same tree (before/after encoding) are compared by the caller,
/// never merged.
#[derive(Clone, Debug, Default)]
pub struct DirectoryInfo {
    /// Canonical absolute root of the scan.
    pub path: PathBuf,
    pub file_count: u64,
    /// Directories below the root; the root itself is not counted.
    pub dir_count: u64,
    /// Absolute directory paths in walk order (sorted by name at each level).
    pub sub_directories: Vec<PathBuf>,
    pub total_size: u64,
    pub jpeg_count: u64,
    pub png_count: u64,
    pub gif_count: u64,
    pub classified_files: Vec<FileRecord>,
    pub unclassified_files: Vec<FileRecord>,
    /// Entries below the root that could not be read during the walk, with the error message.
    pub skipped: Vec<(PathBuf, String)>,
}

impl DirectoryInfo {
    /// Empty snapshot for `path` (e.g. an output root that does not exist yet).
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Count a file and file it under classified or unclassified.
    pub(crate) fn record_file(&mut self, record: FileRecord) {
        self.file_count += 1;
        self.total_size += record.size;
        match record.kind {
            ImageKind::Jpeg => self.jpeg_count += 1,
            ImageKind::Png => self.png_count += 1,
            ImageKind::Gif => self.gif_count += 1,
            ImageKind::Unknown => {
                self.unclassified_files.push(record);
                return;
            }
        }
        self.classified_files.push(record);
    }

    pub(crate) fn record_dir(&mut self, path: PathBuf) {
        self.dir_count += 1;
        self.sub_directories.push(path);
    }

    /// Classified files of an enabled kind, in scan order.
    pub fn eligible<'a>(
        &'a self,
        kinds: &'a EnabledKinds,
    ) -> impl Iterator<Item = &'a FileRecord> + 'a {
        self.classified_files
            .iter()
            .filter(move |f| kinds.allows(f.kind))
    }

    pub fn eligible_count(&self, kinds: &EnabledKinds) -> usize {
        self.eligible(kinds).count()
    }

    pub fn count_of(&self, kind: ImageKind) -> u64 {
        match kind {
            ImageKind::Jpeg => self.jpeg_count,
            ImageKind::Png => self.png_count,
            ImageKind::Gif => self.gif_count,
            ImageKind::Unknown => self.unclassified_files.len() as u64,
        }
    }
}

/// Which image kinds get encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnabledKinds {
    pub jpeg: bool,
    pub png: bool,
    pub gif: bool,
}

impl Default for EnabledKinds {
    fn default() -> Self {
        Self {
            jpeg: true,
            png: true,
            gif: true,
        }
    }
}

impl EnabledKinds {
    /// Build from the three per-kind flags. When none is set, every kind is enabled.
    pub fn from_flags(jpeg: bool, png: bool, gif: bool) -> Self {
        if !(jpeg || png || gif) {
            return Self::default();
        }
        Self { jpeg, png, gif }
    }

    pub fn allows(&self, kind: ImageKind) -> bool {
        match kind {
            ImageKind::Jpeg => self.jpeg,
            ImageKind::Png => self.png,
            ImageKind::Gif => self.gif,
            ImageKind::Unknown => false,
        }
    }
}

/// Encoder parameters and dispatch tuning. Treated as pre-validated by the pipeline.
#[derive(Clone, Debug)]
pub struct EncodeSettings {
    /// 0-100.
    pub quality: u8,
    pub lossless: bool,
    pub kinds: EnabledKinds,
    /// Max concurrent encoder processes. When None, one per available core.
    pub workers: Option<usize>,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            quality: EncodeDefaults::QUALITY,
            lossless: false,
            kinds: EnabledKinds::default(),
            workers: None,
        }
    }
}

impl EncodeSettings {
    /// Effective pool size: the configured value or the available thread count, never below 1.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| WorkerThreadLimits::current().all_threads)
            .max(1)
    }
}

/// One unit of encoder work. Consumed by exactly one encoder invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeTask {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub quality: u8,
    pub lossless: bool,
}

/// A task whose encoder invocation failed.
#[derive(Clone, Debug)]
pub struct TaskFailure {
    pub input_path: PathBuf,
    pub message: String,
}

/// Per-run dispatch statistics. Every executed task's outcome is recorded here.
#[derive(Clone, Debug, Default)]
pub struct DispatchOutcome {
    /// Tasks built from eligible files.
    pub eligible: usize,
    /// Tasks whose encoder was actually invoked.
    pub started: usize,
    pub succeeded: usize,
    /// Failures in completion order.
    pub failures: Vec<TaskFailure>,
    /// True when a cancel request left tasks unstarted.
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl DispatchOutcome {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Tasks that never reached the encoder because submission stopped.
    pub fn not_started(&self) -> usize {
        self.eligible.saturating_sub(self.started)
    }
}

/// Before/after accounting for one conversion run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub input_size: u64,
    pub output_size: u64,
    /// Never negative: clamped to zero when the output is larger than the input.
    pub space_saved: u64,
    pub elapsed: Duration,
    pub encoded: usize,
    pub failed: usize,
}
