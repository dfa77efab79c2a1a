/// Size helpers — human-readable byte counts and the GiB threshold conversion.
///
/// All internal sizes are `u64` bytes. Floating point is only used at the
/// display boundary and when converting the user-supplied GiB threshold.

/// Bytes in one gibibyte (2^30).
pub const GIB: u64 = 1 << 30;

const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

/// Format a byte count with binary units, e.g. `9.1 KiB`, `1.00 GiB`.
///
/// Anything under 1 KiB is printed as an exact byte count. GiB and above get
/// two decimals since those are the sizes people compare against thresholds.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Convert a threshold in GiB to bytes (`gib * 2^30`), truncating.
///
/// Negative and NaN inputs clamp to 0; values past `u64::MAX` saturate.
pub fn gib_to_bytes(gib: f64) -> u64 {
    if gib.is_nan() || gib <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    (gib * GIB as f64) as u64
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
