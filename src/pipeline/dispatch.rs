//! Bounded-concurrency encode dispatch.
//!
//! A feeder sends tasks in scan order over a bounded channel to a fixed set of worker threads.
//! Each worker runs one encoder invocation to completion before taking the next task, so at
//! most `workers` encodes are in flight.
//!
//! Failure policy: after the first failed task no further task is started. Tasks already
//! running finish and every executed task's outcome is recorded. [`DispatchOutcome::into_result`]
//! turns the outcome into the first failure.

use anyhow::Result;
use crossbeam_channel::{Receiver, bounded};
use log::{debug, error, warn};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use crate::engine::encoder::Encoder;
use crate::engine::progress::ProgressCallback;
use crate::{DispatchOutcome, EncodeSettings, EncodeTask, FileRecord, TaskFailure};

/// Optional collaborators for a dispatch run.
#[derive(Default)]
pub struct DispatchHooks {
    /// Called with `1` after each executed task completes (success or failure).
    pub on_task_done: Option<ProgressCallback>,
    /// When set to true, no further task is started. Running tasks are not interrupted.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl DispatchHooks {
    fn cancel_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    fn task_done(&self) {
        if let Some(cb) = &self.on_task_done {
            cb(1);
        }
    }
}

/// Shared between the feeder and workers for one run.
#[derive(Default)]
struct DispatchState {
    halted: AtomicBool,
    started: AtomicUsize,
    succeeded: AtomicUsize,
    failures: Mutex<Vec<TaskFailure>>,
}

impl DispatchState {
    fn should_stop(&self, hooks: &DispatchHooks) -> bool {
        self.halted.load(Ordering::Relaxed) || hooks.cancel_requested()
    }
}

/// Build one task per file whose kind is enabled and that has an output path, in file order.
pub fn build_tasks(files: &[FileRecord], settings: &EncodeSettings) -> Vec<EncodeTask> {
    files
        .iter()
        .filter(|f| settings.kinds.allows(f.kind))
        .filter_map(|f| {
            f.output_path.as_ref().map(|out| EncodeTask {
                input_path: f.input_path.clone(),
                output_path: out.clone(),
                quality: settings.quality,
                lossless: settings.lossless,
            })
        })
        .collect()
}

/// Single worker: take tasks until the channel closes. Once a stop is requested, queued tasks
/// are drained without running.
fn encode_worker_loop(
    task_rx: Receiver<EncodeTask>,
    encoder: &dyn Encoder,
    state: &DispatchState,
    hooks: &DispatchHooks,
) {
    while let Ok(task) = task_rx.recv() {
        if state.should_stop(hooks) {
            continue;
        }
        state.started.fetch_add(1, Ordering::Relaxed);
        match encoder.encode(&task) {
            Ok(()) => {
                state.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                warn!("Encoding {} failed: {:#}", task.input_path.display(), err);
                state.halted.store(true, Ordering::Relaxed);
                state
                    .failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(TaskFailure {
                        input_path: task.input_path,
                        message: format!("{:#}", err),
                    });
            }
        }
        hooks.task_done();
    }
}

/// Encode every eligible file in `files` with at most `settings.worker_count()` concurrent
/// encoder calls. Returns once every worker has exited.
pub fn dispatch(
    files: &[FileRecord],
    settings: &EncodeSettings,
    encoder: &dyn Encoder,
    hooks: &DispatchHooks,
) -> DispatchOutcome {
    let start = Instant::now();
    let tasks = build_tasks(files, settings);
    let eligible = tasks.len();
    if tasks.is_empty() {
        debug!("No eligible files; nothing to encode");
        return DispatchOutcome {
            elapsed: start.elapsed(),
            ..Default::default()
        };
    }

    let workers = settings.worker_count().min(eligible);
    debug!("Encoding {} files with {} workers", eligible, workers);

    let state = DispatchState::default();
    let (task_tx, task_rx) = bounded::<EncodeTask>(workers);

    thread::scope(|s| {
        let state = &state;
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            s.spawn(move || encode_worker_loop(task_rx, encoder, state, hooks));
        }
        // Workers hold the only receivers now, so a send fails if they all exit.
        drop(task_rx);

        for task in tasks {
            if state.should_stop(hooks) {
                debug!("Stopping submission");
                break;
            }
            if task_tx.send(task).is_err() {
                break;
            }
        }
        // Dropping the sender closes the channel so workers exit.
        drop(task_tx);
    });

    let started = state.started.load(Ordering::Relaxed);
    let failures = state
        .failures
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    DispatchOutcome {
        eligible,
        started,
        succeeded: state.succeeded.load(Ordering::Relaxed),
        failures,
        // a request that arrived after the last task started stopped nothing
        cancelled: hooks.cancel_requested() && started < eligible,
        elapsed: start.elapsed(),
    }
}

impl DispatchOutcome {
    /// `Err` with the first recorded failure when any task failed; the outcome otherwise.
    pub fn into_result(self) -> Result<Self> {
        match self.failures.first() {
            None => Ok(self),
            Some(first) => {
                error!(
                    "{} of {} started encodes failed",
                    self.failures.len(),
                    self.started
                );
                Err(anyhow::anyhow!(
                    "encoding {} failed: {}",
                    first.input_path.display(),
                    first.message
                ))
            }
        }
    }
}
