//! CLI command handler: plan, print settings, encode (unless --dry-run), print summary.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::EncodeSettings;
use crate::engine::arg_parser::Cli;
use crate::engine::encoder::CwebpEncoder;
use crate::engine::progress::{encode_progress_bar, finish_bar, progress_callback};
use crate::pipeline::{DispatchHooks, plan, run_plan};
use crate::report::{print_settings, print_summary};
use crate::utils::{
    EncodeDefaults, apply_file_to_settings, read_webpify_toml, resolve_kinds, setup_logging,
};

/// Settings resolved from defaults, `.webpify.toml` and the command line (in that order).
#[derive(Clone, Debug)]
pub struct RunOpts {
    pub settings: EncodeSettings,
    pub cwebp: PathBuf,
    pub verbose: bool,
}

/// Merge the config file in `config_dir` with `cli`. Sets up logging as a side effect, since
/// verbosity can come from either source.
pub fn setup_opts(cli: &Cli, config_dir: &Path) -> Result<RunOpts> {
    let file = read_webpify_toml(config_dir);
    let file_verbose = file
        .as_ref()
        .ok()
        .and_then(Option::as_ref)
        .and_then(|f| f.verbose());
    let verbose = cli.verbose.or(file_verbose).unwrap_or(false);
    setup_logging(verbose);

    let file = match file {
        Ok(f) => f,
        Err(err) => {
            warn!("Ignoring config file: {:#}", err);
            None
        }
    };

    let mut settings = EncodeSettings::default();
    let mut file_kinds = (None, None, None);
    let mut cwebp = PathBuf::from(EncodeDefaults::CWEBP_PROGRAM);
    if let Some(f) = &file {
        apply_file_to_settings(f, &mut settings);
        file_kinds = f.kind_flags();
        if let Some(p) = f.cwebp() {
            cwebp = p;
        }
    }

    if let Some(q) = cli.quality {
        settings.quality = q;
    }
    if let Some(l) = cli.lossless {
        settings.lossless = l;
    }
    if cli.workers.is_some() {
        settings.workers = cli.workers;
    }
    if let Some(p) = &cli.cwebp {
        cwebp = p.clone();
    }
    settings.kinds = resolve_kinds(cli.kind_flags(), file_kinds);

    Ok(RunOpts {
        settings,
        cwebp,
        verbose,
    })
}

/// Run the conversion described by `cli`. With --dry-run only the scans run.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let opts = setup_opts(cli, &cwd)?;
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let conversion = plan(&cli.input, &cli.output)?;
    let workers = opts.settings.worker_count();
    print_settings(
        &conversion.input,
        &conversion.output_root,
        &opts.settings,
        workers,
    );

    let eligible = conversion.input.eligible_count(&opts.settings.kinds);
    if cli.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NOTHING WILL BE WRITTEN.");
        return Ok(());
    }

    let encoder = CwebpEncoder::with_program(opts.cwebp.clone());
    if eligible > 0 && !encoder.is_available() {
        anyhow::bail!(
            "Encoder {} not found or not runnable. Install libwebp or pass --cwebp.",
            encoder.program().display()
        );
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let bar = encode_progress_bar(eligible);
    let hooks = DispatchHooks {
        on_task_done: progress_callback(&bar),
        cancel: Some(Arc::clone(&cancel)),
    };

    let result = run_plan(&conversion, &opts.settings, &encoder, &hooks);
    if let Some(bar) = &bar {
        finish_bar(bar, result.as_ref().ok().map(|s| s.encoded + s.failed));
    }
    let summary = result?;
    print_summary(&summary);

    if cancel.load(Ordering::Relaxed) {
        anyhow::bail!("Encoding cancelled by user; files already written were kept");
    }
    Ok(())
}
