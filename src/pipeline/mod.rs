//! Pipeline components: scan, mirror, dispatch, and the orchestrator that runs them in order.

pub mod dispatch;
pub mod error_handler;
pub mod mirror;
pub mod orchestrator;
pub mod sniff;
pub mod walk;

pub use dispatch::{DispatchHooks, build_tasks, dispatch};
pub use error_handler::{report_dispatch_problems, report_skipped_paths};
pub use mirror::mirror_tree;
pub use orchestrator::{ConversionPlan, convert, plan, run_plan};
pub use sniff::{classify_file, sniff_kind};
pub use walk::{WalkOutcome, scan_dir, to_outcome_walkdir};
