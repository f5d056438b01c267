//! Compact labels for metric cards.

/// Format a monetary value as `$1.2M`, `$3.4K` or `$567`.
///
/// Thresholds compare the raw value, so negative amounts always take the
/// plain branch (`-1500.0` → `"$-1500"`).
pub fn format_money(value: f64) -> String {
    if value >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else if value >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${:.0}", value)
    }
}

/// Integer with thousands separators: `12345` → `"12,345"`.
pub fn format_count(count: usize) -> String {
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
