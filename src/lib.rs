//! webpify: batch-convert image trees to WebP
//!
//! Scan an input tree (classifying files by content), mirror its directories under an output
//! root, run an [`Encoder`](engine::Encoder) once per enabled image with bounded concurrency,
//! then account for the size difference.

pub mod engine;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{CwebpEncoder, Encoder};
pub use pipeline::{ConversionPlan, DispatchHooks, convert, plan, run_plan, scan_dir};

/// Result alias used by public webpify API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
