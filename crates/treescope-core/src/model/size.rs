/// Size and count formatting — human-readable numbers for display and export.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

/// Binary units, base 1024. Labelled with the common short forms because
/// that is what users expect in a disk tool.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count into a human-readable string.
///
/// Divides by 1024 while a larger unit remains, then formats with up to
/// two decimals (trailing zeros trimmed): `350 B`, `1.5 KB`, `2.25 GB`.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        return format!("{bytes} B");
    }

    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Format a file or folder count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let digits = count.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_stay_integral() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(350), "350 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn kilobytes_trim_trailing_zeros() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1126), "1.1 KB");
    }

    #[test]
    fn megabytes_and_up() {
        assert_eq!(format_size(1_048_576), "1 MB");
        assert_eq!(format_size(1_610_612_736), "1.5 GB");
        assert_eq!(format_size(2_415_919_104), "2.25 GB");
        assert_eq!(format_size(1_099_511_627_776), "1 TB");
    }

    #[test]
    fn huge_sizes_stay_in_terabytes() {
        // Past the largest unit the value keeps growing instead of wrapping.
        assert_eq!(format_size(1_099_511_627_776 * 2048), "2048 TB");
    }

    #[test]
    fn counts_get_thousand_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
