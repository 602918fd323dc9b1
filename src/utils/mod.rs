pub mod config;
pub mod format;
pub mod logger;
pub mod webpify_toml;

pub use config::*;
pub use format::human_bytes;
pub use logger::{Colors, setup_logging};
pub use webpify_toml::{WebpifyToml, apply_file_to_settings, read_webpify_toml, resolve_kinds};
