//! Human-readable formatting for summary output.

const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// SI (base-1000) byte count, e.g. `1.2 MB`, `340 kB`, `7 B`.
/// One decimal below 10 units, none above.
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    let rounded = (value * 10.0 + 0.5).floor() / 10.0;
    if rounded < 10.0 {
        format!("{:.1} {}", rounded, UNITS[unit])
    } else {
        format!("{:.0} {}", rounded, UNITS[unit])
    }
}
