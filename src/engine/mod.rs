//! Engine module: CLI surface, encoder seam, progress and path tools

pub mod arg_parser;
pub mod cli;
pub mod encoder;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{RunOpts, handle_run, setup_opts};
pub use encoder::{CwebpEncoder, Encoder};
pub use progress::{ProgressBar, ProgressCallback};
pub use tools::{
    check_root_and_canonicalize, is_strictly_under, map_path, path_relative_to, resolve_root,
    trim_extension,
};
