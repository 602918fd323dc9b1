use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::engine::encoder::Encoder;
use crate::engine::tools::{check_root_and_canonicalize, resolve_root};
use crate::pipeline::{self, DispatchHooks};
use crate::report::report_output;
use crate::{DirectoryInfo, EncodeSettings, Summary};

/// Everything known before any write: resolved roots, the input scan (with output paths),
/// and the output tree as it was before the run.
#[derive(Clone, Debug)]
pub struct ConversionPlan {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub input: DirectoryInfo,
    pub output_before: DirectoryInfo,
}

fn verbose() -> bool {
    log::log_enabled!(log::Level::Debug)
}

/// Resolve both roots and take the pre-run scans. Touches nothing on disk.
/// A missing output root is treated as empty.
pub fn plan(input: &Path, output: &Path) -> Result<ConversionPlan> {
    let input_root = check_root_and_canonicalize(input).context("resolve input directory")?;
    let output_root = resolve_root(output).context("resolve output directory")?;
    debug!(
        "Input root {}, output root {}",
        input_root.display(),
        output_root.display()
    );

    let input_info =
        pipeline::scan_dir(&input_root, Some(&output_root)).context("scan input directory")?;
    pipeline::report_skipped_paths(&input_info, verbose());

    let output_before = if output_root.exists() {
        pipeline::scan_dir(&output_root, None).context("scan output directory")?
    } else {
        DirectoryInfo::empty(output_root.clone())
    };

    Ok(ConversionPlan {
        input_root,
        output_root,
        input: input_info,
        output_before,
    })
}

/// Mirror the tree, encode, then account. Stops with the first encode failure once every
/// running task has finished; files already written stay in place.
pub fn run_plan(
    plan: &ConversionPlan,
    settings: &EncodeSettings,
    encoder: &dyn Encoder,
    hooks: &DispatchHooks,
) -> Result<Summary> {
    pipeline::mirror_tree(&plan.input, &plan.output_root).context("mirror output tree")?;

    let outcome = pipeline::dispatch(&plan.input.classified_files, settings, encoder, hooks);
    pipeline::report_dispatch_problems(&outcome, verbose());
    let outcome = outcome.into_result()?;
    info!(
        "Encoded {} of {} files in {:.2?}",
        outcome.succeeded, outcome.eligible, outcome.elapsed
    );

    report_output(&plan.output_root, &plan.input, &plan.output_before, &outcome)
}

/// Convert every enabled image under `input` into WebP under `output`, mirroring the layout.
pub fn convert(
    input: &Path,
    output: &Path,
    settings: &EncodeSettings,
    encoder: &dyn Encoder,
    hooks: &DispatchHooks,
) -> Result<Summary> {
    let conversion = plan(input, output)?;
    run_plan(&conversion, settings, encoder, hooks)
}
