//! Encode progress: a kdam bar shared with the dispatch workers through a callback.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Called from worker threads with the number of items just completed.
pub type ProgressCallback = Box<dyn Fn(usize) + Send + Sync>;

/// Bar over `total` files. `None` when there is nothing to count.
pub fn encode_progress_bar(total: usize) -> Option<ProgressBar> {
    (total > 0).then(|| {
        Arc::new(Mutex::new(kdam::tqdm!(
            total = total,
            desc = "Encoding to WebP",
            animation = Animation::Classic,
            unit = " files"
        )))
    })
}

/// Advance by `n`. Skipped when another worker holds the lock; [`finish_bar`] catches up.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update(n);
    }
}

/// End the bar's line. With `done`, first set the count to it.
pub fn finish_bar(pb: &ProgressBar, done: Option<usize>) {
    if let Ok(mut bar) = pb.lock() {
        if let Some(n) = done {
            let _ = bar.update_to(n);
        }
        let _ = bar.refresh();
        eprintln!();
    }
}

pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<ProgressCallback> {
    let bar = Arc::clone(bar.as_ref()?);
    Some(Box::new(move |n: usize| update_progress_bar(&bar, n)) as ProgressCallback)
}
