//! Encoder seam. The pipeline only sees [`Encoder`]; [`CwebpEncoder`] shells out to `cwebp`.

use anyhow::{Context, Result};
use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::EncodeTask;
use crate::utils::config::EncodeDefaults;

/// Turns one input image into one WebP file. Called concurrently from pool workers;
/// each call must block until the output is written (or has failed).
pub trait Encoder: Send + Sync {
    fn encode(&self, task: &EncodeTask) -> Result<()>;
}

/// Runs the `cwebp` binary once per task.
#[derive(Clone, Debug)]
pub struct CwebpEncoder {
    program: PathBuf,
}

impl Default for CwebpEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CwebpEncoder {
    pub fn new() -> Self {
        Self::with_program(EncodeDefaults::CWEBP_PROGRAM)
    }

    /// Use a specific binary (absolute path or a name resolved through PATH).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `[-lossless] -q <quality> -mt <input> -o <output> -quiet`
    pub fn args(task: &EncodeTask) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(8);
        if task.lossless {
            args.push("-lossless".into());
        }
        args.push("-q".into());
        args.push(task.quality.to_string().into());
        args.push("-mt".into());
        args.push(task.input_path.clone().into_os_string());
        args.push("-o".into());
        args.push(task.output_path.clone().into_os_string());
        args.push("-quiet".into());
        args
    }

    /// True when the binary can be spawned and reports a version.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Encoder for CwebpEncoder {
    fn encode(&self, task: &EncodeTask) -> Result<()> {
        debug!(
            "{} {} -> {}",
            self.program.display(),
            task.input_path.display(),
            task.output_path.display()
        );
        let output = Command::new(&self.program)
            .args(Self::args(task))
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawn {}", self.program.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} exited with {} for {}: {}",
                self.program.display(),
                output.status,
                task.input_path.display(),
                stderr.trim()
            );
        }
        Ok(())
    }
}
