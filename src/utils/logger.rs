use colored::{Color, ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

/// Terminal colors used by log lines and the summary tables.
pub struct Colors;

impl Colors {
    pub const LABEL: Color = Color::Cyan;
    pub const VALUE: Color = Color::White;
    pub const FAILED: Color = Color::Red;
    pub const WARN: Color = Color::Yellow;
    pub const HEADING: Color = Color::Magenta;

    pub fn colorize(color: Color, s: &str) -> ColoredString {
        s.color(color)
    }
}

/// `[webpify]` for info/debug, `[webpify WARN module]` for problems.
fn format_line(record: &Record) -> String {
    let name = Colors::colorize(Colors::LABEL, env!("CARGO_PKG_NAME"));
    let tag = match record.level() {
        Level::Error => Colors::colorize(Colors::FAILED, "ERROR"),
        Level::Warn => Colors::colorize(Colors::WARN, "WARN"),
        _ => return format!("[{}] {}", name, record.args()),
    };
    let target = Colors::colorize(Colors::VALUE, record.target());
    format!("[{} {} {}] {}", name, tag, target, record.args())
}

/// Install the colored stderr logger: debug for this crate when verbose, info otherwise,
/// warnings only from dependencies. `RUST_LOG` still applies on top.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init: tests call this repeatedly
    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| writeln!(buf, "{}", format_line(record)))
        .try_init();
}
