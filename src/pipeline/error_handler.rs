use log::warn;

use crate::{DirectoryInfo, DispatchOutcome};

/// Log entries the scan could not read. Listed one per line when verbose.
pub fn report_skipped_paths(info: &DirectoryInfo, verbose: bool) {
    let skipped = info.skipped.len();
    if skipped == 0 {
        return;
    }
    warn!(
        "Skipped {} paths under {} due to permission errors or access issues",
        skipped,
        info.path.display()
    );
    if verbose {
        for (p, msg) in &info.skipped {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}

/// Log every failed encode and any tasks left unstarted. Call after dispatch has joined.
pub fn report_dispatch_problems(outcome: &DispatchOutcome, verbose: bool) {
    if !outcome.failures.is_empty() && verbose {
        for f in &outcome.failures {
            eprintln!("  failed: {} ({})", f.input_path.display(), f.message);
        }
    }
    let not_started = outcome.not_started();
    if not_started > 0 {
        let reason = if outcome.cancelled {
            "cancelled"
        } else {
            "an earlier failure"
        };
        warn!("{} files were not encoded because of {}", not_started, reason);
    }
}
