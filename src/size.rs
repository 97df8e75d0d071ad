//! Human-readable byte sizes.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const K: u64 = 1024;

/// Render a byte count as `"<value> <unit>"` using powers of 1024.
///
/// The value is rounded to two decimals and printed without trailing zeros. Sizes of 1 TiB
/// and above stay in GB.
///
/// ```rust
/// use rust_file_ingestion::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exp = 0usize;
    let mut divisor = 1u64;
    while exp + 1 < UNITS.len() && bytes / divisor >= K {
        divisor *= K;
        exp += 1;
    }

    let value = bytes as f64 / divisor as f64;
    format!("{} {}", round2(value), UNITS[exp])
}

/// Round to two decimals; `Display` for `f64` already drops trailing zeros.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
