//! Post-run accounting and the settings/summary tables printed by the CLI.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::pipeline::walk::scan_dir;
use crate::utils::{Colors, human_bytes};
use crate::{DirectoryInfo, DispatchOutcome, EncodeSettings, ImageKind, Summary};

/// Size reported for the output tree.
///
/// Normally the post-run total. When the output tree was larger before the run than after,
/// the difference between the two is reported instead.
// NOTE: (before - after) is not the size of anything this run wrote. Flagged in DESIGN.md.
pub fn output_size(before: u64, after: u64) -> u64 {
    if before > after { before - after } else { after }
}

/// Input total minus post-run output total, never below zero.
pub fn space_saved(input_total: u64, output_after: u64) -> u64 {
    input_total.saturating_sub(output_after)
}

/// Derive the run summary from the input scan and the output scans taken before and after dispatch.
/// A run with nothing to encode saved nothing.
pub fn account(
    input: &DirectoryInfo,
    output_before: &DirectoryInfo,
    output_after: &DirectoryInfo,
    dispatch: &DispatchOutcome,
) -> Summary {
    Summary {
        input_size: input.total_size,
        output_size: output_size(output_before.total_size, output_after.total_size),
        space_saved: if dispatch.eligible == 0 {
            0
        } else {
            space_saved(input.total_size, output_after.total_size)
        },
        elapsed: dispatch.elapsed,
        encoded: dispatch.succeeded,
        failed: dispatch.failed(),
    }
}

/// Re-scan `output_root` and account against the pre-run snapshots.
pub fn report_output(
    output_root: &Path,
    input: &DirectoryInfo,
    output_before: &DirectoryInfo,
    dispatch: &DispatchOutcome,
) -> Result<Summary> {
    let output_after = scan_dir(output_root, None)
        .with_context(|| format!("re-scan output {}", output_root.display()))?;
    debug!(
        "Output size before {} bytes, after {} bytes",
        output_before.total_size, output_after.total_size
    );
    Ok(account(input, output_before, &output_after, dispatch))
}

fn print_section(title: &str) {
    println!();
    println!("{}", Colors::colorize(Colors::HEADING, title));
}

fn print_rows(rows: &[(&str, String)]) {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!(
            "  {}  {}",
            Colors::colorize(Colors::LABEL, &format!("{:<width$}", label)),
            Colors::colorize(Colors::VALUE, value)
        );
    }
}

/// Settings and scan counts shown before encoding starts (and for `--dry-run`).
pub fn print_settings(
    input: &DirectoryInfo,
    output_root: &Path,
    settings: &EncodeSettings,
    workers: usize,
) {
    let kinds = &settings.kinds;
    print_section("Currently configured encoding settings.");
    print_rows(&[
        ("Input Directory", input.path.display().to_string()),
        ("Output Directory", output_root.display().to_string()),
        ("Number of Files", input.file_count.to_string()),
        ("Number of Directories", input.dir_count.to_string()),
        ("Total Size Before Encoding", human_bytes(input.total_size)),
        ("Jpegs Enabled", kinds.jpeg.to_string()),
        ("Jpegs Found", input.count_of(ImageKind::Jpeg).to_string()),
        ("Pngs Enabled", kinds.png.to_string()),
        ("Pngs Found", input.count_of(ImageKind::Png).to_string()),
        ("Gifs Enabled", kinds.gif.to_string()),
        ("Gifs Found", input.count_of(ImageKind::Gif).to_string()),
        ("Other Files", input.count_of(ImageKind::Unknown).to_string()),
        ("Files To Encode", input.eligible_count(kinds).to_string()),
        ("Lossless Enabled", settings.lossless.to_string()),
        ("Quality", settings.quality.to_string()),
        ("Workers", workers.to_string()),
    ]);
}

/// Summary shown after a successful run.
pub fn print_summary(summary: &Summary) {
    print_section("Encoding Summary");
    print_rows(&[
        ("Files Encoded", summary.encoded.to_string()),
        (
            "Total Input File Size Before Encoding",
            human_bytes(summary.input_size),
        ),
        (
            "Total Output File Size After Encoding",
            human_bytes(summary.output_size),
        ),
        ("Total Space Saved", human_bytes(summary.space_saved)),
        (
            "Total Time Taken to Encode All Files",
            format!("{:.2?}", summary.elapsed),
        ),
    ]);
    if summary.failed > 0 {
        println!(
            "  {}",
            Colors::colorize(Colors::FAILED, &format!("{} files failed", summary.failed))
        );
    }
}
